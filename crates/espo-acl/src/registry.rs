//! Named checker implementations.
//!
//! Metadata refers to checker implementations by name
//! (`aclDefs.<scope>.accessCheckerClassName` and friends). The
//! [`CheckerRegistry`] maps those names to constructor functions, each taking
//! the manager the checker will call back into.
//!
//! # Example
//!
//! ```rust
//! use espo_acl::{CheckerRegistry, DefaultAccessChecker};
//!
//! let mut registry = CheckerRegistry::with_builtins();
//! registry.register_access("custom.lead", |m| Box::new(DefaultAccessChecker::new(m)));
//!
//! assert!(registry.access_checker("custom.lead").is_some());
//! assert!(registry.access_checker("user").is_some());
//! ```

use std::collections::HashMap;

use crate::access::{AccessChecker, DefaultAccessChecker, ImportAccessChecker, UserAccessChecker};
use crate::manager::AclManager;
use crate::ownership::{
    DefaultOwnershipChecker, OwnershipChecker, PortalAccountOwnershipChecker,
    PortalContactOwnershipChecker, PortalDefaultOwnershipChecker,
    PortalNotificationOwnershipChecker, UserOwnershipChecker,
};

/// Builds an access checker bound to a manager.
pub type AccessCheckerConstructor = for<'m> fn(&'m AclManager) -> Box<dyn AccessChecker + 'm>;

/// Builds an ownership checker bound to a manager.
pub type OwnershipCheckerConstructor =
    for<'m> fn(&'m AclManager) -> Box<dyn OwnershipChecker + 'm>;

/// Implementation name → constructor, for both checker kinds.
#[derive(Debug, Clone, Default)]
pub struct CheckerRegistry {
    access: HashMap<String, AccessCheckerConstructor>,
    ownership: HashMap<String, OwnershipCheckerConstructor>,
}

impl CheckerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in checker.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register_access(DefaultAccessChecker::NAME, |m| {
            Box::new(DefaultAccessChecker::new(m))
        });
        registry.register_access(UserAccessChecker::NAME, |m| {
            Box::new(UserAccessChecker::new(m))
        });
        registry.register_access(ImportAccessChecker::NAME, |_| Box::new(ImportAccessChecker));

        registry.register_ownership(DefaultOwnershipChecker::NAME, |m| {
            Box::new(DefaultOwnershipChecker::new(m))
        });
        registry.register_ownership(UserOwnershipChecker::NAME, |_| {
            Box::new(UserOwnershipChecker)
        });
        registry.register_ownership(PortalDefaultOwnershipChecker::NAME, |m| {
            Box::new(PortalDefaultOwnershipChecker::new(m))
        });
        registry.register_ownership(PortalAccountOwnershipChecker::NAME, |m| {
            Box::new(PortalAccountOwnershipChecker::new(m))
        });
        registry.register_ownership(PortalContactOwnershipChecker::NAME, |_| {
            Box::new(PortalContactOwnershipChecker)
        });
        registry.register_ownership(PortalNotificationOwnershipChecker::NAME, |_| {
            Box::new(PortalNotificationOwnershipChecker)
        });

        registry
    }

    /// Register an access checker under `name`, replacing any previous one.
    pub fn register_access(&mut self, name: impl Into<String>, ctor: AccessCheckerConstructor) {
        let name = name.into();
        if self.access.insert(name.clone(), ctor).is_some() {
            log::debug!("access checker '{name}' replaced");
        }
    }

    /// Register an ownership checker under `name`, replacing any previous one.
    pub fn register_ownership(
        &mut self,
        name: impl Into<String>,
        ctor: OwnershipCheckerConstructor,
    ) {
        let name = name.into();
        if self.ownership.insert(name.clone(), ctor).is_some() {
            log::debug!("ownership checker '{name}' replaced");
        }
    }

    /// Constructor of a named access checker.
    pub fn access_checker(&self, name: &str) -> Option<AccessCheckerConstructor> {
        self.access.get(name).copied()
    }

    /// Constructor of a named ownership checker.
    pub fn ownership_checker(&self, name: &str) -> Option<OwnershipCheckerConstructor> {
        self.ownership.get(name).copied()
    }

    /// Registered access checker names, sorted.
    pub fn access_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.access.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered ownership checker names, sorted.
    pub fn ownership_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ownership.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

// ============================================================================
// Tests
// ============================================================================
