//! Read-only view of ORM records.
//!
//! The ACL pipeline never mutates entities; it only reads identity, type and
//! a handful of attributes. [`Entity`] captures exactly that surface and
//! [`Record`] is the generic, attribute-map backed implementation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute holding the creator's user ID.
pub const ATTR_CREATED_BY_ID: &str = "createdById";
/// Attribute holding the assigned user's ID.
pub const ATTR_ASSIGNED_USER_ID: &str = "assignedUserId";

/// A record as seen by access checks.
pub trait Entity: std::fmt::Debug {
    /// Entity type, which doubles as the ACL scope name.
    fn entity_type(&self) -> &str;

    /// Record ID; `None` for records that are not yet persisted.
    fn id(&self) -> Option<&str>;

    /// Raw attribute value.
    fn get(&self, attribute: &str) -> Option<&Value>;

    /// Whether the attribute is present (even if null).
    fn has_attribute(&self, attribute: &str) -> bool {
        self.get(attribute).is_some()
    }

    /// Attribute as a string, if it is one.
    fn get_str(&self, attribute: &str) -> Option<&str> {
        self.get(attribute).and_then(Value::as_str)
    }

    /// Attribute as a boolean; anything but `true` reads as `false`.
    fn get_bool(&self, attribute: &str) -> bool {
        self.get(attribute)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Whether the `<link>Ids` attribute of a link-multiple field is loaded.
    fn has_link_multiple_ids(&self, link: &str) -> bool {
        self.get(&link_ids_attribute(link))
            .is_some_and(Value::is_array)
    }

    /// IDs of a link-multiple field, read from its `<link>Ids` attribute.
    ///
    /// Returns an empty list when the field is not loaded.
    fn link_multiple_id_list(&self, link: &str) -> Vec<String> {
        match self.get(&link_ids_attribute(link)) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Name of the attribute that carries the IDs of a link-multiple field.
pub fn link_ids_attribute(link: &str) -> String {
    format!("{link}Ids")
}

/// Generic attribute-map record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    attributes: Map<String, Value>,
}

impl Record {
    /// Create a persisted record.
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: Some(id.into()),
            attributes: Map::new(),
        }
    }

    /// Create a record that has no ID yet.
    pub fn unsaved(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: None,
            attributes: Map::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(attribute, value);
        self
    }

    /// Builder-style setter for a link-multiple field's IDs.
    pub fn with_link_multiple<I, S>(mut self, link: &str, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<Value> = ids.into_iter().map(|id| Value::String(id.into())).collect();
        self.attributes
            .insert(link_ids_attribute(link), Value::Array(ids));
        self
    }

    /// Set an attribute.
    pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(attribute.into(), value.into());
    }

    /// All attributes.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}

impl Entity for Record {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }
}
