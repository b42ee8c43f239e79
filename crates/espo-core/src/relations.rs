//! Relation lookups against the record store.
//!
//! Ownership checks sometimes need relations that are not loaded on the
//! entity at hand (for example the teams of a record fetched without its
//! link-multiple fields). [`RelationLookup`] is the seam to the store; the
//! ACL layer calls it synchronously and lets its errors propagate.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Blocking relation queries.
pub trait RelationLookup: Send + Sync {
    /// IDs related to `entity_type`/`id` through `link`.
    fn related_ids(&self, entity_type: &str, id: &str, link: &str) -> Result<Vec<String>>;
}

/// A single stored relation row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    /// Entity type of the near side.
    pub entity_type: String,
    /// ID of the near side.
    pub id: String,
    /// Link name.
    pub link: String,
    /// IDs on the far side.
    pub ids: Vec<String>,
}

type RelationKey = (String, String, String);

/// In-memory relation store, used by the CLI fixtures and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRelations {
    relations: HashMap<RelationKey, BTreeSet<String>>,
    unavailable: bool,
}

impl InMemoryRelations {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add relations.
    pub fn relate<I, S>(&mut self, entity_type: &str, id: &str, link: &str, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relations
            .entry((entity_type.to_string(), id.to_string(), link.to_string()))
            .or_default()
            .extend(ids.into_iter().map(Into::into));
    }

    /// Builder-style [`relate`](Self::relate).
    pub fn with<I, S>(mut self, entity_type: &str, id: &str, link: &str, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relate(entity_type, id, link, ids);
        self
    }

    /// Load stored rows.
    pub fn from_relations(rows: impl IntoIterator<Item = Relation>) -> Self {
        let mut store = Self::new();
        for row in rows {
            store.relate(&row.entity_type, &row.id, &row.link, row.ids);
        }
        store
    }

    /// Make every lookup fail, simulating an unreachable store.
    pub fn unavailable() -> Self {
        Self {
            relations: HashMap::new(),
            unavailable: true,
        }
    }

    /// Number of stored (entity, link) pairs.
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

impl RelationLookup for InMemoryRelations {
    fn related_ids(&self, entity_type: &str, id: &str, link: &str) -> Result<Vec<String>> {
        if self.unavailable {
            return Err(Error::lookup(entity_type, id, link, "store unavailable"));
        }

        log::trace!("relation lookup {entity_type}.{link} for '{id}'");

        let key = (entity_type.to_string(), id.to_string(), link.to_string());
        Ok(self
            .relations
            .get(&key)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default())
    }
}
