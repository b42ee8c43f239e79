//! Application metadata store.
//!
//! Metadata is a nested tree (`scopes`, `aclDefs`, ...) addressed by key
//! paths such as `["aclDefs", "User", "accessCheckerClassName"]`. The ACL
//! pipeline reads it at call time, so overrides take effect without a
//! registry rebuild.
//!
//! # Usage
//!
//! ```rust
//! use espo_core::Metadata;
//!
//! let metadata = Metadata::from_json_str(r#"{
//!     "scopes": { "Account": { "entity": true, "acl": true } },
//!     "aclDefs": { "User": { "accessCheckerClassName": "user" } }
//! }"#).unwrap();
//!
//! assert!(metadata.has_scope("Account"));
//! assert_eq!(
//!     metadata.get_str(&["aclDefs", "User", "accessCheckerClassName"]),
//!     Some("user")
//! );
//! ```

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Top-level key of the scope registry.
pub const KEY_SCOPES: &str = "scopes";
/// Top-level key of ACL definitions.
pub const KEY_ACL_DEFS: &str = "aclDefs";

/// Read-only metadata tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    data: Value,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            data: Value::Object(Map::new()),
        }
    }
}

impl Metadata {
    /// Wrap an already parsed tree. The root must be an object.
    pub fn from_value(data: Value) -> Result<Self> {
        if !data.is_object() {
            return Err(Error::config("metadata root must be an object"));
        }
        Ok(Self { data })
    }

    /// Parse JSON metadata.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(content)?)
    }

    /// Parse TOML metadata.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let value: toml::Value = toml::from_str(content)?;
        let data = serde_json::to_value(value)?;
        Self::from_value(data)
    }

    /// Load metadata from a `.json` or `.toml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            other => Err(Error::config(format!(
                "unsupported metadata format {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    /// Builder-style setter used by tests and fixtures.
    pub fn with(mut self, path: &[&str], value: impl Into<Value>) -> Self {
        self.set(path, value.into());
        self
    }

    /// Set a value at a key path, creating intermediate objects.
    pub fn set(&mut self, path: &[&str], value: Value) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };

        let mut current = &mut self.data;
        for part in parents {
            if !current.get(*part).is_some_and(Value::is_object) {
                if let Some(map) = current.as_object_mut() {
                    map.insert((*part).to_string(), Value::Object(Map::new()));
                }
            }
            current = match current.get_mut(*part) {
                Some(next) => next,
                None => return,
            };
        }

        if let Some(map) = current.as_object_mut() {
            map.insert((*last).to_string(), value);
        }
    }

    /// Navigate a key path.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let mut current = &self.data;
        for part in path {
            current = current.as_object()?.get(*part)?;
        }
        Some(current)
    }

    /// Navigate a key path and read a non-empty string.
    pub fn get_str(&self, path: &[&str]) -> Option<&str> {
        self.get(path)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Whether a scope is registered.
    ///
    /// A scope entry counts when it is present and not `null`, `false` or an
    /// empty object.
    pub fn has_scope(&self, scope: &str) -> bool {
        match self.get(&[KEY_SCOPES, scope]) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::Object(map)) => !map.is_empty(),
            Some(_) => true,
        }
    }

    /// Names of all registered scopes.
    pub fn scope_names(&self) -> Vec<&str> {
        self.get(&[KEY_SCOPES])
            .and_then(Value::as_object)
            .map(|map| {
                map.keys()
                    .map(String::as_str)
                    .filter(|scope| self.has_scope(scope))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Read an `aclDefs.<scope>.<key>` entry.
    pub fn acl_def(&self, scope: &str, key: &str) -> Option<&str> {
        self.get_str(&[KEY_ACL_DEFS, scope, key])
    }
}
