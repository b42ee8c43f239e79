//! Command handlers.
//!
//! Each handler takes a loaded fixture and returns the decision, leaving
//! printing to the binary.

use std::fmt;
use std::str::FromStr;

use espo_acl::{Action, Level, Permission};
use espo_core::user::USER_ENTITY_TYPE;

use crate::config::{AclConfig, Summary};
use crate::error::{Error, Result};

/// A `TYPE:ID` record reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    /// Entity type
    pub entity_type: String,
    /// Record ID
    pub id: String,
}

impl FromStr for EntityRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((entity_type, id)) if !entity_type.is_empty() && !id.is_empty() => Ok(Self {
                entity_type: entity_type.to_string(),
                id: id.to_string(),
            }),
            _ => Err(Error::InvalidEntityRef(s.to_string())),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.id)
    }
}

/// Whether `user_id` may perform `action` on a record.
///
/// Lookup failures deny rather than error.
pub fn cmd_check(
    config: &AclConfig,
    user_id: &str,
    entity: &EntityRef,
    action: Action,
) -> Result<bool> {
    let manager = config.manager()?;
    let user = config.user(user_id)?;
    let record = config.record(&entity.entity_type, &entity.id)?;

    let allowed = manager.is_allowed(&user, &record, action)?;
    log::info!("{user_id} {action} {entity}: {}", verdict(allowed));
    Ok(allowed)
}

/// Whether `user_id` has any access to a scope, or to one action in it.
pub fn cmd_scope(
    config: &AclConfig,
    user_id: &str,
    scope: &str,
    action: Option<Action>,
) -> Result<bool> {
    let manager = config.manager()?;
    let user = config.user(user_id)?;
    Ok(manager.check_scope(&user, scope, action)?)
}

/// Whether a user-to-user permission lets `user_id` act on `target_id`.
pub fn cmd_permission(
    config: &AclConfig,
    user_id: &str,
    target_id: &str,
    permission: Permission,
) -> Result<bool> {
    let manager = config.manager()?;
    let user = config.user(user_id)?;
    let target = config.record(USER_ENTITY_TYPE, target_id)?;
    Ok(manager.check_user_permission(&user, &target, permission)?)
}

/// The level `user_id` holds for an action in a scope.
pub fn cmd_level(config: &AclConfig, user_id: &str, scope: &str, action: Action) -> Result<Level> {
    let manager = config.manager()?;
    let user = config.user(user_id)?;
    Ok(manager.level(&user, scope, action)?)
}

/// Validate the fixture.
pub fn cmd_validate(config: &AclConfig) -> Result<Summary> {
    config.validate()
}

/// `allow` or `deny`.
pub fn verdict(allowed: bool) -> &'static str {
    if allowed { "allow" } else { "deny" }
}
