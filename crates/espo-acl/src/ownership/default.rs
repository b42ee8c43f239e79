use espo_core::entity::{ATTR_ASSIGNED_USER_ID, ATTR_CREATED_BY_ID};
use espo_core::user::LINK_TEAMS;
use espo_core::{Entity, RelationLookup, User};

use super::{OwnershipChecker, intersects, link_ids};
use crate::error::Result;
use crate::manager::AclManager;

const LINK_ASSIGNED_USERS: &str = "assignedUsers";

/// Ownership for internal users: assignment, creation and teams.
pub struct DefaultOwnershipChecker<'m> {
    relations: &'m dyn RelationLookup,
}

impl<'m> DefaultOwnershipChecker<'m> {
    /// Registry name.
    pub const NAME: &'static str = "default";

    /// Create a checker bound to a manager's record store.
    pub fn new(manager: &'m AclManager) -> Self {
        Self {
            relations: manager.relations(),
        }
    }
}

impl OwnershipChecker for DefaultOwnershipChecker<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check_own(&self, user: &User, entity: &dyn Entity) -> Result<bool> {
        let user_id = user.user_id();

        if entity.has_link_multiple_ids(LINK_ASSIGNED_USERS) {
            return Ok(entity
                .link_multiple_id_list(LINK_ASSIGNED_USERS)
                .iter()
                .any(|id| id == user_id));
        }

        if entity.has_attribute(ATTR_ASSIGNED_USER_ID) {
            return Ok(entity.get_str(ATTR_ASSIGNED_USER_ID) == Some(user_id));
        }

        Ok(entity.get_str(ATTR_CREATED_BY_ID) == Some(user_id))
    }

    fn check_team(&self, user: &User, entity: &dyn Entity) -> Result<bool> {
        let user_teams = link_ids(self.relations, user, LINK_TEAMS)?;
        if user_teams.is_empty() {
            return Ok(false);
        }

        let entity_teams = link_ids(self.relations, entity, LINK_TEAMS)?;
        Ok(intersects(&entity_teams, &user_teams))
    }
}
