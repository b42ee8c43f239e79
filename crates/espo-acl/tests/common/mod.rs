//! Common test utilities and harness for espo-acl integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use espo_acl::{
    AclManager, CheckerRegistry, ImportAccessChecker, PermissionTable,
    PortalAccountOwnershipChecker, PortalContactOwnershipChecker,
    PortalNotificationOwnershipChecker, Realm, StaticTables, UserAccessChecker,
    UserOwnershipChecker,
};
use espo_core::{InMemoryRelations, Metadata, RelationLookup};
use serde_json::json;

/// Metadata with the usual CRM scopes and their checker overrides.
pub fn crm_metadata() -> Metadata {
    let mut metadata = Metadata::default();
    for scope in ["Account", "Contact", "Lead", "Case", "Task", "Notification", "User"] {
        metadata.set(&["scopes", scope], json!({ "entity": true, "acl": true }));
    }

    metadata
        .with(
            &["aclDefs", "User", "accessCheckerClassName"],
            UserAccessChecker::NAME,
        )
        .with(
            &["aclDefs", "User", "ownershipCheckerClassName"],
            UserOwnershipChecker::NAME,
        )
        .with(
            &["aclDefs", "Import", "accessCheckerClassName"],
            ImportAccessChecker::NAME,
        )
        .with(
            &["aclDefs", "Account", "portalOwnershipCheckerClassName"],
            PortalAccountOwnershipChecker::NAME,
        )
        .with(
            &["aclDefs", "Contact", "portalOwnershipCheckerClassName"],
            PortalContactOwnershipChecker::NAME,
        )
        .with(
            &["aclDefs", "Notification", "portalOwnershipCheckerClassName"],
            PortalNotificationOwnershipChecker::NAME,
        )
}

/// Record store that counts its lookups.
#[derive(Debug, Default)]
pub struct CountingRelations {
    /// Backing store
    pub inner: InMemoryRelations,
    /// Number of lookups so far
    pub calls: AtomicUsize,
}

impl CountingRelations {
    /// Wrap a store.
    pub fn new(inner: InMemoryRelations) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of lookups so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RelationLookup for CountingRelations {
    fn related_ids(
        &self,
        entity_type: &str,
        id: &str,
        link: &str,
    ) -> espo_core::Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.related_ids(entity_type, id, link)
    }
}

/// Test harness for integration tests.
///
/// Holds the pieces an [`AclManager`] is built from so each test can adjust
/// one of them.
pub struct TestHarness {
    /// Metadata tree
    pub metadata: Metadata,
    /// Permission tables by user ID
    pub tables: StaticTables,
    /// Record store
    pub relations: Arc<dyn RelationLookup>,
    /// Checker registry
    pub registry: CheckerRegistry,
}

impl TestHarness {
    /// Harness with CRM metadata, no tables and an empty record store.
    pub fn new() -> Self {
        Self {
            metadata: crm_metadata(),
            tables: StaticTables::new(),
            relations: Arc::new(InMemoryRelations::new()),
            registry: CheckerRegistry::with_builtins(),
        }
    }

    /// Give a user a permission table.
    pub fn with_table(mut self, user_id: &str, table: PermissionTable) -> Self {
        self.tables.insert(user_id, table);
        self
    }

    /// Use a record store.
    pub fn with_relations(mut self, relations: Arc<dyn RelationLookup>) -> Self {
        self.relations = relations;
        self
    }

    /// Build a manager for internal users.
    pub fn manager(&self) -> AclManager {
        self.build(Realm::Internal)
    }

    /// Build a manager for portal users.
    pub fn portal_manager(&self) -> AclManager {
        self.build(Realm::Portal)
    }

    fn build(&self, realm: Realm) -> AclManager {
        AclManager::new(
            Arc::new(self.metadata.clone()),
            Arc::new(self.tables.clone()),
        )
        .with_registry(Arc::new(self.registry.clone()))
        .with_relations(Arc::clone(&self.relations))
        .with_realm(realm)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Every action of a scope at one level.
pub fn uniform(level: &str) -> serde_json::Value {
    json!({
        "create": level,
        "read": level,
        "edit": level,
        "delete": level,
        "stream": level
    })
}
