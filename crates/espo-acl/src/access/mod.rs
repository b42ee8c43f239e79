//! Access checkers.
//!
//! An [`AccessChecker`] decides scope-level and entity-level actions for one
//! scope. The [`DefaultAccessChecker`] evaluates levels against ownership;
//! specialized checkers add rules for their scope and delegate the rest to
//! a default checker they hold.

mod default;
mod factory;
mod import;
mod user;

pub use default::DefaultAccessChecker;
pub use factory::AccessCheckerFactory;
pub use import::ImportAccessChecker;
pub use user::UserAccessChecker;

use espo_core::{Entity, User};

use crate::error::Result;
use crate::scope_data::ScopeData;
use crate::table::Action;

/// Per-scope access strategy.
///
/// Entity actions an implementation does not support deny.
pub trait AccessChecker {
    /// Registry name of the implementation.
    fn name(&self) -> &'static str;

    /// Scope-level access, optionally for one action.
    fn check_scope(&self, user: &User, data: &ScopeData, action: Option<Action>) -> Result<bool>;

    /// Create the entity.
    fn check_entity_create(
        &self,
        _user: &User,
        _entity: &dyn Entity,
        _data: &ScopeData,
    ) -> Result<bool> {
        Ok(false)
    }

    /// Read the entity.
    fn check_entity_read(
        &self,
        _user: &User,
        _entity: &dyn Entity,
        _data: &ScopeData,
    ) -> Result<bool> {
        Ok(false)
    }

    /// Edit the entity.
    fn check_entity_edit(
        &self,
        _user: &User,
        _entity: &dyn Entity,
        _data: &ScopeData,
    ) -> Result<bool> {
        Ok(false)
    }

    /// Delete the entity.
    fn check_entity_delete(
        &self,
        _user: &User,
        _entity: &dyn Entity,
        _data: &ScopeData,
    ) -> Result<bool> {
        Ok(false)
    }

    /// Follow the entity's stream.
    fn check_entity_stream(
        &self,
        _user: &User,
        _entity: &dyn Entity,
        _data: &ScopeData,
    ) -> Result<bool> {
        Ok(false)
    }

    /// Dispatch an entity action to its method.
    fn check_entity(
        &self,
        user: &User,
        entity: &dyn Entity,
        data: &ScopeData,
        action: Action,
    ) -> Result<bool> {
        match action {
            Action::Create => self.check_entity_create(user, entity, data),
            Action::Read => self.check_entity_read(user, entity, data),
            Action::Edit => self.check_entity_edit(user, entity, data),
            Action::Delete => self.check_entity_delete(user, entity, data),
            Action::Stream => self.check_entity_stream(user, entity, data),
        }
    }
}
