use espo_core::entity::ATTR_CREATED_BY_ID;
use espo_core::{Entity, User};

use super::AccessChecker;
use crate::error::Result;
use crate::scope_data::ScopeData;
use crate::table::Action;

/// Access checker of the `Import` scope.
///
/// The scope is all-or-nothing. An import record is readable and deletable
/// by administrators and by the user who ran it.
#[derive(Debug, Default)]
pub struct ImportAccessChecker;

impl ImportAccessChecker {
    /// Registry name.
    pub const NAME: &'static str = "import";

    fn is_runner(user: &User, entity: &dyn Entity) -> bool {
        user.is_admin() || entity.get_str(ATTR_CREATED_BY_ID) == Some(user.user_id())
    }
}

impl AccessChecker for ImportAccessChecker {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check_scope(&self, _user: &User, data: &ScopeData, action: Option<Action>) -> Result<bool> {
        Ok(match action {
            None | Some(Action::Read) | Some(Action::Delete) => data.is_true(),
            Some(_) => false,
        })
    }

    fn check_entity_read(
        &self,
        user: &User,
        entity: &dyn Entity,
        _data: &ScopeData,
    ) -> Result<bool> {
        Ok(Self::is_runner(user, entity))
    }

    fn check_entity_delete(
        &self,
        user: &User,
        entity: &dyn Entity,
        _data: &ScopeData,
    ) -> Result<bool> {
        Ok(Self::is_runner(user, entity))
    }
}
