//! The acting user and the `User` entity type.
//!
//! A [`User`] is both the subject of every access check and, for the `User`
//! scope, its target. It is backed by a [`Record`] so the same value can be
//! handed to checkers as an [`Entity`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::{Entity, Record};
use crate::error::{Error, Result};

/// Entity type name of users.
pub const USER_ENTITY_TYPE: &str = "User";

/// Attribute holding the user type.
pub const ATTR_TYPE: &str = "type";
/// Attribute holding the portal user's contact.
pub const ATTR_CONTACT_ID: &str = "contactId";

/// Link of the teams a user belongs to.
pub const LINK_TEAMS: &str = "teams";
/// Link of the accounts a portal user belongs to.
pub const LINK_ACCOUNTS: &str = "accounts";
/// Link of the portals a portal user has access to.
pub const LINK_PORTALS: &str = "portals";

/// Privilege tier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserType {
    /// Ordinary internal user.
    #[default]
    Regular,
    /// Administrator.
    Admin,
    /// External user confined to portals.
    Portal,
    /// API user.
    Api,
    /// The internal system user.
    System,
    /// Administrator tier protected from ordinary administrators.
    SuperAdmin,
}

impl UserType {
    /// String form stored in the `type` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Regular => "regular",
            UserType::Admin => "admin",
            UserType::Portal => "portal",
            UserType::Api => "api",
            UserType::System => "system",
            UserType::SuperAdmin => "super-admin",
        }
    }

    /// Reads the user type of an entity.
    ///
    /// Returns `None` when the entity is not a `User`. A `User` without a
    /// readable `type` attribute is regular.
    pub fn of(entity: &dyn Entity) -> Option<UserType> {
        if entity.entity_type() != USER_ENTITY_TYPE {
            return None;
        }

        Some(
            entity
                .get_str(ATTR_TYPE)
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
        )
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "regular" => Ok(UserType::Regular),
            "admin" => Ok(UserType::Admin),
            "portal" => Ok(UserType::Portal),
            "api" => Ok(UserType::Api),
            "system" => Ok(UserType::System),
            "super-admin" => Ok(UserType::SuperAdmin),
            other => Err(Error::InvalidAttribute {
                entity_type: USER_ENTITY_TYPE.to_string(),
                attribute: ATTR_TYPE.to_string(),
                message: format!("unknown user type '{other}'"),
            }),
        }
    }
}

/// Flag helpers that apply to any entity that is a `User`.
///
/// They answer `false` for entities of other types.
pub fn is_admin(entity: &dyn Entity) -> bool {
    matches!(
        UserType::of(entity),
        Some(UserType::Admin | UserType::SuperAdmin | UserType::System)
    )
}

/// See [`is_admin`].
pub fn is_super_admin(entity: &dyn Entity) -> bool {
    UserType::of(entity) == Some(UserType::SuperAdmin)
}

/// See [`is_admin`].
pub fn is_portal(entity: &dyn Entity) -> bool {
    UserType::of(entity) == Some(UserType::Portal)
}

/// See [`is_admin`].
pub fn is_system(entity: &dyn Entity) -> bool {
    UserType::of(entity) == Some(UserType::System)
}

/// A user record with typed accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    record: Record,
}

impl User {
    /// Create a user of the given type.
    pub fn new(id: impl Into<String>, user_type: UserType) -> Self {
        Self {
            record: Record::new(USER_ENTITY_TYPE, id).with(ATTR_TYPE, user_type.as_str()),
        }
    }

    /// Wrap an existing record, validating its type.
    pub fn from_record(record: Record) -> Result<Self> {
        if record.entity_type() != USER_ENTITY_TYPE {
            return Err(Error::config(format!(
                "expected a {USER_ENTITY_TYPE} record, got {}",
                record.entity_type()
            )));
        }
        if record.id().is_none() {
            return Err(Error::config("a user must have an id"));
        }
        if let Some(raw) = record.get_str(ATTR_TYPE) {
            raw.parse::<UserType>()?;
        }

        Ok(Self { record })
    }

    /// Set the teams the user belongs to.
    pub fn with_teams<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record = self.record.with_link_multiple(LINK_TEAMS, ids);
        self
    }

    /// Set the accounts a portal user belongs to.
    pub fn with_accounts<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record = self.record.with_link_multiple(LINK_ACCOUNTS, ids);
        self
    }

    /// Set the portals a portal user has access to.
    pub fn with_portals<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record = self.record.with_link_multiple(LINK_PORTALS, ids);
        self
    }

    /// Set the contact a portal user is linked to.
    pub fn with_contact(mut self, contact_id: impl Into<String>) -> Self {
        self.record.set(ATTR_CONTACT_ID, Value::String(contact_id.into()));
        self
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.record.set(attribute, value);
        self
    }

    /// User ID. Always present, enforced at construction.
    pub fn user_id(&self) -> &str {
        self.record.id().unwrap_or_default()
    }

    /// User type.
    pub fn user_type(&self) -> UserType {
        UserType::of(&self.record).unwrap_or_default()
    }

    /// Admin, super-admin or system.
    pub fn is_admin(&self) -> bool {
        is_admin(&self.record)
    }

    /// Super-admin only.
    pub fn is_super_admin(&self) -> bool {
        is_super_admin(&self.record)
    }

    /// Portal user.
    pub fn is_portal(&self) -> bool {
        is_portal(&self.record)
    }

    /// API user.
    pub fn is_api(&self) -> bool {
        self.user_type() == UserType::Api
    }

    /// The system user.
    pub fn is_system(&self) -> bool {
        is_system(&self.record)
    }

    /// Team IDs.
    pub fn team_ids(&self) -> Vec<String> {
        self.record.link_multiple_id_list(LINK_TEAMS)
    }

    /// Account IDs (portal users).
    pub fn account_ids(&self) -> Vec<String> {
        self.record.link_multiple_id_list(LINK_ACCOUNTS)
    }

    /// Portal IDs (portal users).
    pub fn portal_ids(&self) -> Vec<String> {
        self.record.link_multiple_id_list(LINK_PORTALS)
    }

    /// Contact ID (portal users).
    pub fn contact_id(&self) -> Option<&str> {
        self.record.get_str(ATTR_CONTACT_ID)
    }

    /// The underlying record.
    pub fn record(&self) -> &Record {
        &self.record
    }
}

impl Entity for User {
    fn entity_type(&self) -> &str {
        self.record.entity_type()
    }

    fn id(&self) -> Option<&str> {
        self.record.id()
    }

    fn get(&self, attribute: &str) -> Option<&Value> {
        self.record.get(attribute)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_type_flags() {
        let admin = User::new("u1", UserType::Admin);
        assert!(admin.is_admin());
        assert!(!admin.is_super_admin());

        let super_admin = User::new("u2", UserType::SuperAdmin);
        assert!(super_admin.is_admin());
        assert!(super_admin.is_super_admin());

        let system = User::new("system", UserType::System);
        assert!(system.is_admin());
        assert!(system.is_system());

        let portal = User::new("u3", UserType::Portal);
        assert!(portal.is_portal());
        assert!(!portal.is_admin());

        let api = User::new("u4", UserType::Api);
        assert!(api.is_api());
        assert!(!api.is_admin());
    }

    #[test]
    fn test_user_type_roundtrip_strings() {
        for t in [
            UserType::Regular,
            UserType::Admin,
            UserType::Portal,
            UserType::Api,
            UserType::System,
            UserType::SuperAdmin,
        ] {
            assert_eq!(t.as_str().parse::<UserType>().unwrap(), t);
        }
        assert!("root".parse::<UserType>().is_err());
    }

    #[test]
    fn test_user_type_of_non_user_entity() {
        let record = Record::new("Account", "a1").with("type", "admin");
        assert_eq!(UserType::of(&record), None);
        assert!(!is_admin(&record));
    }

    #[test]
    fn test_user_type_of_user_without_type_is_regular() {
        let record = Record::new(USER_ENTITY_TYPE, "u1");
        assert_eq!(UserType::of(&record), Some(UserType::Regular));
    }

    #[test]
    fn test_user_relations() {
        let user = User::new("u1", UserType::Portal)
            .with_teams(["t1"])
            .with_accounts(["a1", "a2"])
            .with_portals(["p1"])
            .with_contact("c1");

        assert_eq!(user.user_id(), "u1");
        assert_eq!(user.team_ids(), vec!["t1"]);
        assert_eq!(user.account_ids(), vec!["a1", "a2"]);
        assert_eq!(user.portal_ids(), vec!["p1"]);
        assert_eq!(user.contact_id(), Some("c1"));
    }

    #[test]
    fn test_user_is_an_entity() {
        let user = User::new("u1", UserType::Regular);
        let entity: &dyn Entity = &user;
        assert_eq!(entity.entity_type(), "User");
        assert_eq!(entity.id(), Some("u1"));
        assert_eq!(entity.get_str("type"), Some("regular"));
    }

    #[test]
    fn test_from_record_validation() {
        assert!(User::from_record(Record::new("Contact", "c1")).is_err());
        assert!(User::from_record(Record::unsaved(USER_ENTITY_TYPE)).is_err());
        assert!(
            User::from_record(Record::new(USER_ENTITY_TYPE, "u1").with("type", "wizard")).is_err()
        );

        let user =
            User::from_record(Record::new(USER_ENTITY_TYPE, "u1").with("type", "super-admin"))
                .unwrap();
        assert!(user.is_super_admin());
    }
}
