//! Ownership checkers.
//!
//! An [`OwnershipChecker`] answers, per axis, whether a user "owns" an
//! entity: directly, through a team, or (for portal users) through an
//! account or contact. Implementations are resolved per scope by the
//! [`OwnershipCheckerFactory`] and constructed with the calling manager.
//!
//! An implementation answers only the axes it supports; the rest are
//! `false`.

mod default;
mod factory;
mod portal;
mod user;

pub use default::DefaultOwnershipChecker;
pub use factory::OwnershipCheckerFactory;
pub use portal::{
    PortalAccountOwnershipChecker, PortalContactOwnershipChecker, PortalDefaultOwnershipChecker,
    PortalNotificationOwnershipChecker,
};
pub use user::UserOwnershipChecker;

use espo_core::{Entity, RelationLookup, User};

use crate::error::Result;

/// Per-scope ownership strategy.
pub trait OwnershipChecker {
    /// Registry name of the implementation.
    fn name(&self) -> &'static str;

    /// The user owns the entity.
    fn check_own(&self, _user: &User, _entity: &dyn Entity) -> Result<bool> {
        Ok(false)
    }

    /// The entity belongs to one of the user's teams.
    fn check_team(&self, _user: &User, _entity: &dyn Entity) -> Result<bool> {
        Ok(false)
    }

    /// The entity belongs to one of the portal user's accounts.
    fn check_account(&self, _user: &User, _entity: &dyn Entity) -> Result<bool> {
        Ok(false)
    }

    /// The entity belongs to the portal user's contact.
    fn check_contact(&self, _user: &User, _entity: &dyn Entity) -> Result<bool> {
        Ok(false)
    }
}

/// IDs of a link-multiple field: the loaded `<link>Ids` if present,
/// otherwise a store lookup for persisted entities.
pub(crate) fn link_ids(
    relations: &dyn RelationLookup,
    entity: &dyn Entity,
    link: &str,
) -> Result<Vec<String>> {
    if entity.has_link_multiple_ids(link) {
        return Ok(entity.link_multiple_id_list(link));
    }

    match entity.id() {
        Some(id) => Ok(relations.related_ids(entity.entity_type(), id, link)?),
        None => Ok(Vec::new()),
    }
}

fn intersects(a: &[String], b: &[String]) -> bool {
    a.iter().any(|id| b.contains(id))
}
