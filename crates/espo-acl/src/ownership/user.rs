use espo_core::{Entity, User};

use super::OwnershipChecker;
use crate::error::Result;

/// Ownership of `User` records: a user owns their own record.
#[derive(Debug, Default)]
pub struct UserOwnershipChecker;

impl UserOwnershipChecker {
    /// Registry name.
    pub const NAME: &'static str = "user";
}

impl OwnershipChecker for UserOwnershipChecker {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check_own(&self, user: &User, entity: &dyn Entity) -> Result<bool> {
        Ok(entity.id() == Some(user.user_id()))
    }
}
