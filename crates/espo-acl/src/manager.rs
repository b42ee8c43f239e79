//! The ACL manager: entry point for every access decision.
//!
//! An [`AclManager`] ties together the metadata, the checker registry, the
//! per-user permission tables and the record store. Checkers are resolved
//! per call through the factories and receive the manager explicitly, so
//! they can call back into it for ownership and permission lookups.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use espo_core::user::LINK_TEAMS;
use espo_core::{Entity, InMemoryRelations, Metadata, RelationLookup, User};

use crate::access::AccessCheckerFactory;
use crate::error::{Error, Result};
use crate::ownership::{OwnershipCheckerFactory, link_ids};
use crate::registry::CheckerRegistry;
use crate::scope_data::ScopeData;
use crate::table::{Action, Level, Permission, PermissionTable, TableProvider};

/// Which users a manager evaluates for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Realm {
    /// Users of the CRM itself.
    #[default]
    Internal,
    /// Users of a customer portal.
    Portal,
}

impl Realm {
    /// Metadata key naming a scope's access checker in this realm.
    pub fn access_checker_key(&self) -> &'static str {
        match self {
            Realm::Internal => "accessCheckerClassName",
            Realm::Portal => "portalAccessCheckerClassName",
        }
    }

    /// Metadata key naming a scope's ownership checker in this realm.
    pub fn ownership_checker_key(&self) -> &'static str {
        match self {
            Realm::Internal => "ownershipCheckerClassName",
            Realm::Portal => "portalOwnershipCheckerClassName",
        }
    }

    /// Name of the realm.
    pub fn as_str(&self) -> &'static str {
        match self {
            Realm::Internal => "internal",
            Realm::Portal => "portal",
        }
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Realm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "internal" => Ok(Realm::Internal),
            "portal" => Ok(Realm::Portal),
            other => Err(espo_core::Error::config(format!("unknown realm '{other}'")).into()),
        }
    }
}

/// Evaluates scope, entity and permission checks.
///
/// A manager is cheap to build and meant to live for one request. The only
/// state it keeps is a cache of permission tables, filled on first use per
/// user.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use espo_acl::{Action, AclManager, PermissionTable, StaticTables};
/// use espo_core::{Metadata, Record, User, UserType};
/// use serde_json::json;
///
/// let metadata = Metadata::default().with(&["scopes", "Task"], json!({ "entity": true }));
/// let tables = StaticTables::new().with_table(
///     "u1",
///     PermissionTable::new().with_scope("Task", json!({ "read": "own", "edit": "no" })),
/// );
/// let manager = AclManager::new(Arc::new(metadata), Arc::new(tables));
///
/// let user = User::new("u1", UserType::Regular);
/// let task = Record::new("Task", "t1").with("assignedUserId", "u1");
///
/// assert!(manager.check_entity(&user, &task, Action::Read).unwrap());
/// assert!(!manager.check_entity(&user, &task, Action::Edit).unwrap());
/// ```
pub struct AclManager {
    metadata: Arc<Metadata>,
    registry: Arc<CheckerRegistry>,
    tables: Arc<dyn TableProvider>,
    relations: Arc<dyn RelationLookup>,
    realm: Realm,
    table_cache: Mutex<HashMap<String, Arc<PermissionTable>>>,
    access_factory: AccessCheckerFactory,
    ownership_factory: OwnershipCheckerFactory,
}

impl AclManager {
    /// Create a manager for internal users with the built-in checkers and
    /// an empty record store.
    pub fn new(metadata: Arc<Metadata>, tables: Arc<dyn TableProvider>) -> Self {
        Self {
            metadata,
            registry: Arc::new(CheckerRegistry::with_builtins()),
            tables,
            relations: Arc::new(InMemoryRelations::new()),
            realm: Realm::Internal,
            table_cache: Mutex::new(HashMap::new()),
            access_factory: AccessCheckerFactory::new(),
            ownership_factory: OwnershipCheckerFactory::new(),
        }
    }

    /// Use a different checker registry.
    pub fn with_registry(mut self, registry: Arc<CheckerRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Use a record store for relation lookups.
    pub fn with_relations(mut self, relations: Arc<dyn RelationLookup>) -> Self {
        self.relations = relations;
        self
    }

    /// Evaluate for a different realm.
    pub fn with_realm(mut self, realm: Realm) -> Self {
        self.realm = realm;
        self
    }

    /// Metadata tree.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Checker registry.
    pub fn registry(&self) -> &CheckerRegistry {
        &self.registry
    }

    /// Record store.
    pub fn relations(&self) -> &dyn RelationLookup {
        self.relations.as_ref()
    }

    /// Realm the manager evaluates for.
    pub fn realm(&self) -> Realm {
        self.realm
    }

    // ------------------------------------------------------------------------
    // Permission table
    // ------------------------------------------------------------------------

    /// Permission table of a user, cached per user ID.
    pub fn table(&self, user: &User) -> Result<Arc<PermissionTable>> {
        let mut cache = self
            .table_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(table) = cache.get(user.user_id()) {
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(self.tables.table_for(user)?);
        log::trace!("permission table loaded for user '{}'", user.user_id());
        cache.insert(user.user_id().to_string(), Arc::clone(&table));
        Ok(table)
    }

    /// Scope data of a scope for a user.
    pub fn scope_data(&self, user: &User, scope: &str) -> Result<ScopeData> {
        self.table(user)?.scope_data(scope)
    }

    /// Level of an action on a scope for a user.
    pub fn level(&self, user: &User, scope: &str, action: Action) -> Result<Level> {
        Ok(self.scope_data(user, scope)?.level(action))
    }

    /// Level of a non-scope permission for a user.
    pub fn permission_level(&self, user: &User, permission: Permission) -> Result<Level> {
        Ok(self.table(user)?.permission_level(permission))
    }

    // ------------------------------------------------------------------------
    // Scope and entity checks
    // ------------------------------------------------------------------------

    /// Scope-level access, optionally for one action.
    pub fn check_scope(&self, user: &User, scope: &str, action: Option<Action>) -> Result<bool> {
        let checker = self.access_factory.create(scope, self)?;
        let data = self.scope_data(user, scope)?;
        let allowed = checker.check_scope(user, &data, action)?;

        if !allowed {
            match action {
                Some(action) => log::debug!(
                    "{action} denied on scope '{scope}' for user '{}'",
                    user.user_id()
                ),
                None => log::debug!("scope '{scope}' denied for user '{}'", user.user_id()),
            }
        }
        Ok(allowed)
    }

    /// Entity-level access for one action.
    ///
    /// Record store failures during ownership checks propagate; see
    /// [`AclManager::is_allowed`] for the fail-closed variant.
    pub fn check_entity(&self, user: &User, entity: &dyn Entity, action: Action) -> Result<bool> {
        let scope = entity.entity_type();
        let checker = self.access_factory.create(scope, self)?;
        let data = self.scope_data(user, scope)?;
        let allowed = checker.check_entity(user, entity, &data, action)?;

        if !allowed {
            log::debug!(
                "{action} denied on {scope} '{}' for user '{}' by '{}'",
                entity.id().unwrap_or("new"),
                user.user_id(),
                checker.name()
            );
        }
        Ok(allowed)
    }

    /// Create the entity.
    pub fn check_entity_create(&self, user: &User, entity: &dyn Entity) -> Result<bool> {
        self.check_entity(user, entity, Action::Create)
    }

    /// Read the entity.
    pub fn check_entity_read(&self, user: &User, entity: &dyn Entity) -> Result<bool> {
        self.check_entity(user, entity, Action::Read)
    }

    /// Edit the entity.
    pub fn check_entity_edit(&self, user: &User, entity: &dyn Entity) -> Result<bool> {
        self.check_entity(user, entity, Action::Edit)
    }

    /// Delete the entity.
    pub fn check_entity_delete(&self, user: &User, entity: &dyn Entity) -> Result<bool> {
        self.check_entity(user, entity, Action::Delete)
    }

    /// Follow the entity's stream.
    pub fn check_entity_stream(&self, user: &User, entity: &dyn Entity) -> Result<bool> {
        self.check_entity(user, entity, Action::Stream)
    }

    /// Entity-level access that fails closed.
    ///
    /// Record store failures deny with a warning. Configuration errors,
    /// including scopes without an implementation, still propagate.
    pub fn is_allowed(&self, user: &User, entity: &dyn Entity, action: Action) -> Result<bool> {
        match self.check_entity(user, entity, action) {
            Err(e) if e.is_collaborator_failure() => {
                log::warn!(
                    "{action} on {} '{}' denied for user '{}': {e}",
                    entity.entity_type(),
                    entity.id().unwrap_or("new"),
                    user.user_id()
                );
                Ok(false)
            }
            other => other,
        }
    }

    // ------------------------------------------------------------------------
    // Ownership
    // ------------------------------------------------------------------------

    /// The user owns the entity.
    pub fn check_ownership_own(&self, user: &User, entity: &dyn Entity) -> Result<bool> {
        self.ownership_factory
            .create(entity.entity_type(), self)?
            .check_own(user, entity)
    }

    /// The entity belongs to one of the user's teams.
    pub fn check_ownership_team(&self, user: &User, entity: &dyn Entity) -> Result<bool> {
        self.ownership_factory
            .create(entity.entity_type(), self)?
            .check_team(user, entity)
    }

    /// The entity belongs to one of the portal user's accounts.
    pub fn check_ownership_account(&self, user: &User, entity: &dyn Entity) -> Result<bool> {
        self.ownership_factory
            .create(entity.entity_type(), self)?
            .check_account(user, entity)
    }

    /// The entity belongs to the portal user's contact.
    pub fn check_ownership_contact(&self, user: &User, entity: &dyn Entity) -> Result<bool> {
        self.ownership_factory
            .create(entity.entity_type(), self)?
            .check_contact(user, entity)
    }

    // ------------------------------------------------------------------------
    // User permissions
    // ------------------------------------------------------------------------

    /// Whether a user-to-user permission lets `user` act on `target`.
    ///
    /// Acting on oneself is always allowed. `yes`/`all` allow, `team`
    /// requires a shared team, every other level denies.
    pub fn check_user_permission(
        &self,
        user: &User,
        target: &dyn Entity,
        permission: Permission,
    ) -> Result<bool> {
        if target.id() == Some(user.user_id()) {
            return Ok(true);
        }

        match self.permission_level(user, permission)? {
            Level::Yes | Level::All => Ok(true),
            Level::Team => {
                let teams = link_ids(self.relations(), user, LINK_TEAMS)?;
                if teams.is_empty() {
                    return Ok(false);
                }
                Ok(link_ids(self.relations(), target, LINK_TEAMS)?
                    .iter()
                    .any(|id| teams.contains(id)))
            }
            _ => Ok(false),
        }
    }
}

impl fmt::Debug for AclManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = self
            .table_cache
            .lock()
            .map(|cache| cache.len())
            .unwrap_or_default();
        f.debug_struct("AclManager")
            .field("realm", &self.realm)
            .field("registry", &self.registry)
            .field("cached_tables", &cached)
            .finish_non_exhaustive()
    }
}
