use espo_core::{Entity, User};

use super::AccessChecker;
use crate::error::Result;
use crate::manager::AclManager;
use crate::scope_checker::{ScopeChecker, ScopeCheckerData};
use crate::scope_data::ScopeData;
use crate::table::Action;

/// Level-against-ownership evaluation for any scope.
///
/// Ownership predicates are deferred to the manager's ownership checks, so a
/// level that does not need them never touches the record store.
pub struct DefaultAccessChecker<'m> {
    manager: &'m AclManager,
    scope_checker: ScopeChecker,
}

impl<'m> DefaultAccessChecker<'m> {
    /// Registry name.
    pub const NAME: &'static str = "default";

    /// Create a checker bound to a manager.
    pub fn new(manager: &'m AclManager) -> Self {
        Self {
            manager,
            scope_checker: ScopeChecker::new(),
        }
    }

    fn checker_data<'a>(&self, user: &'a User, entity: &'a dyn Entity) -> ScopeCheckerData<'a>
    where
        'm: 'a,
    {
        let manager = self.manager;
        ScopeCheckerData::builder()
            .set_is_own_checker(move || manager.check_ownership_own(user, entity))
            .set_in_team_checker(move || manager.check_ownership_team(user, entity))
            .set_in_account_checker(move || manager.check_ownership_account(user, entity))
            .set_in_contact_checker(move || manager.check_ownership_contact(user, entity))
            .build()
    }

    fn check_action(
        &self,
        user: &User,
        entity: &dyn Entity,
        data: &ScopeData,
        action: Action,
    ) -> Result<bool> {
        let checker_data = self.checker_data(user, entity);
        self.scope_checker
            .check(data, Some(action), Some(&checker_data))
    }
}

impl AccessChecker for DefaultAccessChecker<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check_scope(&self, _user: &User, data: &ScopeData, action: Option<Action>) -> Result<bool> {
        let checker_data = ScopeCheckerData::builder()
            .set_is_own(true)
            .set_in_team(true)
            .set_in_account(true)
            .set_in_contact(true)
            .build();
        self.scope_checker.check(data, action, Some(&checker_data))
    }

    fn check_entity_create(
        &self,
        user: &User,
        entity: &dyn Entity,
        data: &ScopeData,
    ) -> Result<bool> {
        self.check_action(user, entity, data, Action::Create)
    }

    fn check_entity_read(
        &self,
        user: &User,
        entity: &dyn Entity,
        data: &ScopeData,
    ) -> Result<bool> {
        self.check_action(user, entity, data, Action::Read)
    }

    fn check_entity_edit(
        &self,
        user: &User,
        entity: &dyn Entity,
        data: &ScopeData,
    ) -> Result<bool> {
        self.check_action(user, entity, data, Action::Edit)
    }

    fn check_entity_delete(
        &self,
        user: &User,
        entity: &dyn Entity,
        data: &ScopeData,
    ) -> Result<bool> {
        self.check_action(user, entity, data, Action::Delete)
    }

    fn check_entity_stream(
        &self,
        user: &User,
        entity: &dyn Entity,
        data: &ScopeData,
    ) -> Result<bool> {
        self.check_action(user, entity, data, Action::Stream)
    }
}
