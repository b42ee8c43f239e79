//! Ownership for portal users.
//!
//! Portal users own what they created, and reach further through the
//! accounts they belong to and the contact they are linked to.

use espo_core::entity::ATTR_CREATED_BY_ID;
use espo_core::user::LINK_ACCOUNTS;
use espo_core::{Entity, RelationLookup, User};

use super::{OwnershipChecker, intersects, link_ids};
use crate::error::Result;
use crate::manager::AclManager;

const ACCOUNT: &str = "Account";
const CONTACT: &str = "Contact";
const ATTR_ACCOUNT_ID: &str = "accountId";
const ATTR_CONTACT_ID: &str = "contactId";
const ATTR_PARENT_TYPE: &str = "parentType";
const ATTR_PARENT_ID: &str = "parentId";
const LINK_CONTACTS: &str = "contacts";

fn parent_of<'e>(entity: &'e dyn Entity, parent_type: &str) -> Option<&'e str> {
    if entity.get_str(ATTR_PARENT_TYPE) == Some(parent_type) {
        entity.get_str(ATTR_PARENT_ID)
    } else {
        None
    }
}

/// Default ownership for portal users.
pub struct PortalDefaultOwnershipChecker<'m> {
    relations: &'m dyn RelationLookup,
}

impl<'m> PortalDefaultOwnershipChecker<'m> {
    /// Registry name.
    pub const NAME: &'static str = "portal.default";

    /// Create a checker bound to a manager's record store.
    pub fn new(manager: &'m AclManager) -> Self {
        Self {
            relations: manager.relations(),
        }
    }
}

impl OwnershipChecker for PortalDefaultOwnershipChecker<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check_own(&self, user: &User, entity: &dyn Entity) -> Result<bool> {
        Ok(entity.get_str(ATTR_CREATED_BY_ID) == Some(user.user_id()))
    }

    fn check_account(&self, user: &User, entity: &dyn Entity) -> Result<bool> {
        let accounts = link_ids(self.relations, user, LINK_ACCOUNTS)?;
        if accounts.is_empty() {
            return Ok(false);
        }

        if let Some(account_id) = entity.get_str(ATTR_ACCOUNT_ID) {
            if accounts.iter().any(|id| id == account_id) {
                return Ok(true);
            }
        }

        if let Some(parent_id) = parent_of(entity, ACCOUNT) {
            if accounts.iter().any(|id| id == parent_id) {
                return Ok(true);
            }
        }

        if entity.entity_type() == ACCOUNT {
            return Ok(false);
        }

        let entity_accounts = link_ids(self.relations, entity, LINK_ACCOUNTS)?;
        Ok(intersects(&entity_accounts, &accounts))
    }

    fn check_contact(&self, user: &User, entity: &dyn Entity) -> Result<bool> {
        let Some(contact_id) = user.contact_id() else {
            return Ok(false);
        };

        if entity.get_str(ATTR_CONTACT_ID) == Some(contact_id) {
            return Ok(true);
        }

        if parent_of(entity, CONTACT) == Some(contact_id) {
            return Ok(true);
        }

        if entity.entity_type() == CONTACT {
            return Ok(false);
        }

        Ok(link_ids(self.relations, entity, LINK_CONTACTS)?
            .iter()
            .any(|id| id == contact_id))
    }
}

/// Portal ownership of `Account` records: the user's own accounts.
pub struct PortalAccountOwnershipChecker<'m> {
    relations: &'m dyn RelationLookup,
}

impl<'m> PortalAccountOwnershipChecker<'m> {
    /// Registry name.
    pub const NAME: &'static str = "portal.account";

    /// Create a checker bound to a manager's record store.
    pub fn new(manager: &'m AclManager) -> Self {
        Self {
            relations: manager.relations(),
        }
    }
}

impl OwnershipChecker for PortalAccountOwnershipChecker<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check_account(&self, user: &User, entity: &dyn Entity) -> Result<bool> {
        let Some(id) = entity.id() else {
            return Ok(false);
        };
        Ok(link_ids(self.relations, user, LINK_ACCOUNTS)?
            .iter()
            .any(|account| account == id))
    }
}

/// Portal ownership of `Contact` records: the user's own contact.
#[derive(Debug, Default)]
pub struct PortalContactOwnershipChecker;

impl PortalContactOwnershipChecker {
    /// Registry name.
    pub const NAME: &'static str = "portal.contact";
}

impl OwnershipChecker for PortalContactOwnershipChecker {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check_contact(&self, user: &User, entity: &dyn Entity) -> Result<bool> {
        Ok(entity.id().is_some() && entity.id() == user.contact_id())
    }
}

/// Portal ownership of notifications: addressed to the user.
#[derive(Debug, Default)]
pub struct PortalNotificationOwnershipChecker;

impl PortalNotificationOwnershipChecker {
    /// Registry name.
    pub const NAME: &'static str = "portal.notification";
}

impl OwnershipChecker for PortalNotificationOwnershipChecker {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check_own(&self, user: &User, entity: &dyn Entity) -> Result<bool> {
        Ok(entity.get_str("userId") == Some(user.user_id()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::table::StaticTables;
    use espo_core::{InMemoryRelations, Metadata, Record, UserType};
    use std::sync::Arc;

    fn manager(relations: InMemoryRelations) -> AclManager {
        AclManager::new(Arc::new(Metadata::default()), Arc::new(StaticTables::new()))
            .with_relations(Arc::new(relations))
    }

    fn portal_user() -> User {
        User::new("pu1", UserType::Portal)
            .with_accounts(["a1"])
            .with_contact("c1")
    }

    #[test]
    fn test_own_is_creator() {
        let m = manager(InMemoryRelations::new());
        let checker = PortalDefaultOwnershipChecker::new(&m);

        let created = Record::new("Case", "1").with("createdById", "pu1");
        let assigned = Record::new("Case", "2").with("assignedUserId", "pu1");

        assert!(checker.check_own(&portal_user(), &created).unwrap());
        assert!(!checker.check_own(&portal_user(), &assigned).unwrap());
    }

    #[test]
    fn test_account_by_attribute_and_parent() {
        let m = manager(InMemoryRelations::new());
        let checker = PortalDefaultOwnershipChecker::new(&m);

        let by_attr = Record::new("Case", "1").with("accountId", "a1");
        let by_parent = Record::new("Task", "2")
            .with("parentType", "Account")
            .with("parentId", "a1");
        let other = Record::new("Case", "3").with("accountId", "a2");

        assert!(checker.check_account(&portal_user(), &by_attr).unwrap());
        assert!(checker.check_account(&portal_user(), &by_parent).unwrap());
        assert!(!checker.check_account(&portal_user(), &other).unwrap());
    }

    #[test]
    fn test_account_by_link_multiple_lookup() {
        let m = manager(InMemoryRelations::new().with("Document", "d1", "accounts", ["a1"]));
        let checker = PortalDefaultOwnershipChecker::new(&m);

        assert!(checker
            .check_account(&portal_user(), &Record::new("Document", "d1"))
            .unwrap());
    }

    #[test]
    fn test_account_without_user_accounts() {
        let m = manager(InMemoryRelations::unavailable());
        let checker = PortalDefaultOwnershipChecker::new(&m);
        let user = User::new("pu2", UserType::Portal).with_accounts(Vec::<String>::new());

        let entity = Record::new("Case", "1").with("accountId", "a1");
        assert!(!checker.check_account(&user, &entity).unwrap());
    }

    #[test]
    fn test_contact_axes() {
        let m = manager(InMemoryRelations::new().with("Meeting", "m1", "contacts", ["c1"]));
        let checker = PortalDefaultOwnershipChecker::new(&m);

        let by_attr = Record::new("Case", "1").with("contactId", "c1");
        let by_parent = Record::new("Call", "2")
            .with("parentType", "Contact")
            .with("parentId", "c1");
        let by_link = Record::new("Meeting", "m1");
        let other = Record::new("Case", "3").with("contactId", "c2");

        assert!(checker.check_contact(&portal_user(), &by_attr).unwrap());
        assert!(checker.check_contact(&portal_user(), &by_parent).unwrap());
        assert!(checker.check_contact(&portal_user(), &by_link).unwrap());
        assert!(!checker.check_contact(&portal_user(), &other).unwrap());
    }

    #[test]
    fn test_contact_without_user_contact() {
        let m = manager(InMemoryRelations::unavailable());
        let checker = PortalDefaultOwnershipChecker::new(&m);
        let user = User::new("pu3", UserType::Portal);

        let entity = Record::new("Case", "1").with("contactId", "c1");
        assert!(!checker.check_contact(&user, &entity).unwrap());
    }

    #[test]
    fn test_account_scope_checker() {
        let m = manager(InMemoryRelations::new());
        let checker = PortalAccountOwnershipChecker::new(&m);

        assert!(checker
            .check_account(&portal_user(), &Record::new("Account", "a1"))
            .unwrap());
        assert!(!checker
            .check_account(&portal_user(), &Record::new("Account", "a2"))
            .unwrap());
        assert!(!checker
            .check_own(&portal_user(), &Record::new("Account", "a1"))
            .unwrap());
    }

    #[test]
    fn test_contact_scope_checker() {
        let checker = PortalContactOwnershipChecker;

        assert!(checker
            .check_contact(&portal_user(), &Record::new("Contact", "c1"))
            .unwrap());
        assert!(!checker
            .check_contact(&portal_user(), &Record::new("Contact", "c2"))
            .unwrap());
        assert!(!checker
            .check_contact(&User::new("x", UserType::Portal), &Record::unsaved("Contact"))
            .unwrap());
    }

    #[test]
    fn test_notification_checker() {
        let checker = PortalNotificationOwnershipChecker;

        let mine = Record::new("Notification", "n1").with("userId", "pu1");
        let theirs = Record::new("Notification", "n2").with("userId", "pu2");

        assert!(checker.check_own(&portal_user(), &mine).unwrap());
        assert!(!checker.check_own(&portal_user(), &theirs).unwrap());
    }
}
