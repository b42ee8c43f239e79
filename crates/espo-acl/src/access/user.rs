//! Access to `User` records.
//!
//! Guards administrator and system accounts on top of the default level
//! evaluation. Portal users are visible only through the portal permission.

use espo_core::user::{is_portal, is_super_admin, is_system};
use espo_core::{Entity, User};

use super::{AccessChecker, DefaultAccessChecker};
use crate::error::Result;
use crate::manager::AclManager;
use crate::scope_data::ScopeData;
use crate::table::{Action, Level, Permission};

/// Access checker of the `User` scope.
pub struct UserAccessChecker<'m> {
    default: DefaultAccessChecker<'m>,
    manager: &'m AclManager,
}

impl<'m> UserAccessChecker<'m> {
    /// Registry name.
    pub const NAME: &'static str = "user";

    /// Create a checker bound to a manager.
    pub fn new(manager: &'m AclManager) -> Self {
        Self {
            default: DefaultAccessChecker::new(manager),
            manager,
        }
    }
}

/// A super-admin target is off limits to anyone below super-admin.
fn guards_super_admin(user: &User, target: &dyn Entity) -> bool {
    is_super_admin(target) && !user.is_super_admin()
}

impl AccessChecker for UserAccessChecker<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check_scope(&self, user: &User, data: &ScopeData, action: Option<Action>) -> Result<bool> {
        self.default.check_scope(user, data, action)
    }

    fn check_entity_create(
        &self,
        user: &User,
        entity: &dyn Entity,
        data: &ScopeData,
    ) -> Result<bool> {
        if !user.is_admin() || guards_super_admin(user, entity) {
            return Ok(false);
        }
        self.default.check_entity_create(user, entity, data)
    }

    fn check_entity_read(
        &self,
        user: &User,
        entity: &dyn Entity,
        data: &ScopeData,
    ) -> Result<bool> {
        if is_portal(entity) {
            return Ok(self.manager.permission_level(user, Permission::Portal)? == Level::Yes);
        }
        if guards_super_admin(user, entity) {
            return Ok(false);
        }
        self.default.check_entity_read(user, entity, data)
    }

    fn check_entity_edit(
        &self,
        user: &User,
        entity: &dyn Entity,
        data: &ScopeData,
    ) -> Result<bool> {
        if is_system(entity) {
            return Ok(false);
        }
        if !user.is_admin() && entity.id() != Some(user.user_id()) {
            return Ok(false);
        }
        if guards_super_admin(user, entity) {
            return Ok(false);
        }
        self.default.check_entity_edit(user, entity, data)
    }

    fn check_entity_delete(
        &self,
        user: &User,
        entity: &dyn Entity,
        data: &ScopeData,
    ) -> Result<bool> {
        if !user.is_admin() || is_system(entity) || guards_super_admin(user, entity) {
            return Ok(false);
        }
        self.default.check_entity_delete(user, entity, data)
    }

    fn check_entity_stream(
        &self,
        user: &User,
        entity: &dyn Entity,
        _data: &ScopeData,
    ) -> Result<bool> {
        self.manager.check_user_permission(user, entity, Permission::User)
    }
}
