//! Actions, levels, permissions and the per-user permission table.
//!
//! The permission table is the result of role aggregation, which happens
//! elsewhere; here it is a value handed in through a [`TableProvider`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use espo_core::User;

use crate::error::{Error, Result};
use crate::scope_data::ScopeData;

/// Action performed on a scope or record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Create a record.
    Create,
    /// Read a record.
    Read,
    /// Edit a record.
    Edit,
    /// Delete a record.
    Delete,
    /// Follow a record's stream.
    Stream,
}

impl Action {
    /// All actions, in table order.
    pub const ALL: [Action; 5] = [
        Action::Create,
        Action::Read,
        Action::Edit,
        Action::Delete,
        Action::Stream,
    ];

    /// Table key of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Stream => "stream",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| Error::InvalidScopeData(format!("unknown action '{s}'")))
    }
}

/// Permission granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Not granted.
    None,
    /// Records the user owns.
    Own,
    /// Records of the user's teams.
    Team,
    /// Records of the portal user's accounts.
    Account,
    /// Records of the portal user's contact.
    Contact,
    /// Every record.
    All,
    /// Granted (boolean actions and permissions).
    Yes,
    /// Denied (boolean actions and permissions).
    No,
}

impl Level {
    /// All levels.
    pub const ALL: [Level; 8] = [
        Level::None,
        Level::Own,
        Level::Team,
        Level::Account,
        Level::Contact,
        Level::All,
        Level::Yes,
        Level::No,
    ];

    /// Table token of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::None => "none",
            Level::Own => "own",
            Level::Team => "team",
            Level::Account => "account",
            Level::Contact => "contact",
            Level::All => "all",
            Level::Yes => "yes",
            Level::No => "no",
        }
    }

    /// Whether the level grants regardless of ownership.
    pub fn is_unconditional(&self) -> bool {
        matches!(self, Level::All | Level::Yes)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Level::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| Error::InvalidScopeData(format!("unknown level '{s}'")))
    }
}

/// Non-scope permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    /// Assigning records to other users.
    Assignment,
    /// Viewing other users.
    User,
    /// Messaging other users.
    Message,
    /// Viewing portal users.
    Portal,
    /// Using group email accounts.
    GroupEmailAccount,
    /// Exporting records.
    Export,
    /// Mass-updating records.
    MassUpdate,
    /// Data privacy tooling.
    DataPrivacy,
}

impl Permission {
    /// All permissions.
    pub const ALL: [Permission; 8] = [
        Permission::Assignment,
        Permission::User,
        Permission::Message,
        Permission::Portal,
        Permission::GroupEmailAccount,
        Permission::Export,
        Permission::MassUpdate,
        Permission::DataPrivacy,
    ];

    /// Table key of the permission.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Assignment => "assignment",
            Permission::User => "user",
            Permission::Message => "message",
            Permission::Portal => "portal",
            Permission::GroupEmailAccount => "groupEmailAccount",
            Permission::Export => "export",
            Permission::MassUpdate => "massUpdate",
            Permission::DataPrivacy => "dataPrivacy",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.strip_suffix("Permission").unwrap_or(s);
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == key)
            .ok_or_else(|| Error::InvalidScopeData(format!("unknown permission '{s}'")))
    }
}

/// Aggregated permissions of one user.
///
/// Scopes hold raw scope data (`true`, `false` or an action→level table);
/// permissions hold a level each, keyed by the permission name with or
/// without the `Permission` suffix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionTable {
    #[serde(default)]
    scopes: BTreeMap<String, Value>,
    #[serde(default)]
    permissions: BTreeMap<String, Level>,
}

impl PermissionTable {
    /// Create an empty table: every scope and permission denied.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a scope's raw data.
    pub fn with_scope(mut self, scope: impl Into<String>, raw: impl Into<Value>) -> Self {
        self.scopes.insert(scope.into(), raw.into());
        self
    }

    /// Set a permission level.
    pub fn with_permission(mut self, permission: Permission, level: Level) -> Self {
        self.permissions
            .insert(permission.as_str().to_string(), level);
        self
    }

    /// Scope data for a scope; absent scopes are denied.
    pub fn scope_data(&self, scope: &str) -> Result<ScopeData> {
        match self.scopes.get(scope) {
            Some(raw) => ScopeData::from_raw(raw),
            None => Ok(ScopeData::denied()),
        }
    }

    /// Level of a permission; absent permissions are `No`.
    pub fn permission_level(&self, permission: Permission) -> Level {
        let key = permission.as_str();
        self.permissions
            .get(key)
            .or_else(|| self.permissions.get(&format!("{key}Permission")))
            .copied()
            .unwrap_or(Level::No)
    }

    /// Scope names present in the table.
    pub fn scope_names(&self) -> impl Iterator<Item = &str> {
        self.scopes.keys().map(String::as_str)
    }

    /// Actions whose level token the pipeline does not recognize, per scope.
    ///
    /// Such actions evaluate as `none`. Entries that fail to parse are
    /// skipped; [`PermissionTable::validate`] reports those.
    pub fn unrecognized_levels(&self) -> Vec<(&str, Action)> {
        let mut found = Vec::new();
        for (scope, raw) in &self.scopes {
            let Ok(data) = ScopeData::from_raw(raw) else {
                continue;
            };
            for action in data.actions() {
                if !data.has_recognized_level(action) {
                    found.push((scope.as_str(), action));
                }
            }
        }
        found
    }

    /// Check every scope entry parses, reporting the first that does not.
    pub fn validate(&self) -> Result<()> {
        for (scope, raw) in &self.scopes {
            ScopeData::from_raw(raw)
                .map_err(|e| Error::InvalidScopeData(format!("scope '{scope}': {e}")))?;
        }
        for key in self.permissions.keys() {
            key.parse::<Permission>()?;
        }
        Ok(())
    }
}

/// Source of per-user permission tables.
pub trait TableProvider: Send + Sync {
    /// Produce the table of a user.
    fn table_for(&self, user: &User) -> Result<PermissionTable>;
}

/// Tables keyed by user ID, with an optional fallback.
#[derive(Debug, Clone, Default)]
pub struct StaticTables {
    tables: HashMap<String, PermissionTable>,
    fallback: Option<PermissionTable>,
}

impl StaticTables {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user's table.
    pub fn with_table(mut self, user_id: impl Into<String>, table: PermissionTable) -> Self {
        self.tables.insert(user_id.into(), table);
        self
    }

    /// Table used for users without their own.
    pub fn with_fallback(mut self, table: PermissionTable) -> Self {
        self.fallback = Some(table);
        self
    }

    /// Register a user's table in place.
    pub fn insert(&mut self, user_id: impl Into<String>, table: PermissionTable) {
        self.tables.insert(user_id.into(), table);
    }
}

impl TableProvider for StaticTables {
    fn table_for(&self, user: &User) -> Result<PermissionTable> {
        self.tables
            .get(user.user_id())
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| Error::NoTable {
                user_id: user.user_id().to_string(),
            })
    }
}
