//! TOML fixtures describing an ACL world.
//!
//! A fixture holds everything a decision needs: the realm, the metadata
//! tree, users with their permission tables, records and stored relations.
//!
//! ```toml
//! realm = "internal"
//!
//! [metadata.scopes.Account]
//! entity = true
//!
//! [[users]]
//! id = "u1"
//! type = "regular"
//! teams = ["t1"]
//!
//! [users.table.scopes]
//! Account = { read = "team", edit = "own" }
//!
//! [[records]]
//! entityType = "Account"
//! id = "a1"
//! attributes = { assignedUserId = "u2" }
//!
//! [[relations]]
//! entityType = "Account"
//! id = "a1"
//! link = "teams"
//! ids = ["t1"]
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use espo_acl::{AclManager, PermissionTable, Realm, StaticTables};
use espo_core::user::USER_ENTITY_TYPE;
use espo_core::{Entity, InMemoryRelations, Metadata, Record, Relation, User, UserType};

use crate::error::{Error, Result};

/// Environment variable naming the fixture file.
pub const CONFIG_ENV: &str = "ESPO_ACL_CONFIG";

/// A user in a fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    /// User ID
    pub id: String,
    /// User tier
    #[serde(rename = "type", default)]
    pub user_type: UserType,
    /// Team IDs
    #[serde(default)]
    pub teams: Vec<String>,
    /// Account IDs (portal users)
    #[serde(default)]
    pub accounts: Vec<String>,
    /// Contact ID (portal users)
    #[serde(default)]
    pub contact: Option<String>,
    /// Aggregated permission table
    #[serde(default)]
    pub table: Option<PermissionTable>,
}

impl UserConfig {
    /// Build the user. Team and account lists are always loaded, so they
    /// never hit the record store.
    pub fn to_user(&self) -> User {
        let user = User::new(self.id.as_str(), self.user_type)
            .with_teams(self.teams.iter().cloned())
            .with_accounts(self.accounts.iter().cloned());
        match &self.contact {
            Some(contact) => user.with_contact(contact.as_str()),
            None => user,
        }
    }
}

/// A whole fixture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AclConfig {
    /// Realm decisions are made in
    #[serde(default)]
    pub realm: Realm,
    /// Metadata tree (`scopes`, `aclDefs`)
    #[serde(default)]
    pub metadata: Option<Value>,
    /// Users
    #[serde(default)]
    pub users: Vec<UserConfig>,
    /// Records
    #[serde(default)]
    pub records: Vec<Record>,
    /// Stored relations
    #[serde(default)]
    pub relations: Vec<Relation>,
}

/// Counts reported by a successful validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Registered scopes
    pub scopes: usize,
    /// Users
    pub users: usize,
    /// Users with a permission table
    pub tables: usize,
    /// Records
    pub records: usize,
    /// Relation rows
    pub relations: usize,
    /// Table actions whose level token is not recognized (read as `none`)
    pub unrecognized_levels: usize,
}

impl AclConfig {
    /// Parse a fixture.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a fixture file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config = Self::from_toml_str(&content)?;
        log::debug!(
            "loaded fixture {} ({} users, {} records)",
            path.display(),
            config.users.len(),
            config.records.len()
        );
        Ok(config)
    }

    /// Metadata tree; an absent `[metadata]` section is empty.
    pub fn metadata(&self) -> Result<Metadata> {
        match &self.metadata {
            Some(value) => Ok(Metadata::from_value(value.clone())?),
            None => Ok(Metadata::default()),
        }
    }

    /// Look up a user.
    pub fn user(&self, id: &str) -> Result<User> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .map(UserConfig::to_user)
            .ok_or_else(|| Error::UnknownUser(id.to_string()))
    }

    /// Look up a record. `User` records resolve to fixture users.
    pub fn record(&self, entity_type: &str, id: &str) -> Result<Record> {
        if let Some(record) = self
            .records
            .iter()
            .find(|r| r.entity_type() == entity_type && r.id() == Some(id))
        {
            return Ok(record.clone());
        }

        if entity_type == USER_ENTITY_TYPE {
            if let Ok(user) = self.user(id) {
                return Ok(user.record().clone());
            }
        }

        Err(Error::UnknownRecord {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        })
    }

    /// Permission tables of every user that has one.
    pub fn tables(&self) -> StaticTables {
        let mut tables = StaticTables::new();
        for user in &self.users {
            if let Some(table) = &user.table {
                tables.insert(user.id.as_str(), table.clone());
            }
        }
        tables
    }

    /// Build a manager over the fixture.
    pub fn manager(&self) -> Result<AclManager> {
        let relations = InMemoryRelations::from_relations(self.relations.iter().cloned());
        Ok(
            AclManager::new(Arc::new(self.metadata()?), Arc::new(self.tables()))
                .with_relations(Arc::new(relations))
                .with_realm(self.realm),
        )
    }

    /// Check the fixture is internally consistent.
    ///
    /// Every table must parse and every user ID must be unique. Records of
    /// scopes the metadata does not know are reported as warnings only.
    pub fn validate(&self) -> Result<Summary> {
        let metadata = self.metadata()?;

        let mut seen = HashSet::new();
        let mut unrecognized_levels = 0;
        for user in &self.users {
            if !seen.insert(user.id.as_str()) {
                let message = format!("duplicate user '{}'", user.id);
                return Err(espo_core::Error::config(message).into());
            }
            if let Some(table) = &user.table {
                table.validate()?;
                for (scope, action) in table.unrecognized_levels() {
                    log::warn!(
                        "user '{}': unrecognized level for {scope}.{action} reads as none",
                        user.id
                    );
                    unrecognized_levels += 1;
                }
            }
        }

        for record in &self.records {
            let entity_type = record.entity_type();
            if !metadata.has_scope(entity_type) {
                log::warn!("record type '{entity_type}' is not a registered scope");
            }
        }

        Ok(Summary {
            scopes: metadata.scope_names().len(),
            users: self.users.len(),
            tables: self.users.iter().filter(|u| u.table.is_some()).count(),
            records: self.records.len(),
            relations: self.relations.len(),
            unrecognized_levels,
        })
    }
}
