//! # espo-acl
//!
//! Access control evaluation for Espo records.
//!
//! A decision flows through four layers:
//! - [`PermissionTable`] / [`ScopeData`]: the user's level per scope and action
//! - [`OwnershipChecker`]: whether the user owns, shares a team with, or (in
//!   the portal) is affiliated with a record
//! - [`ScopeChecker`]: combines a level with lazily evaluated ownership facts
//! - [`AccessChecker`]: per-scope strategy, with rules for special scopes
//!   layered over the default evaluation
//!
//! [`AclManager`] is the entry point. Checkers are chosen per scope through
//! metadata (`aclDefs.<scope>.*CheckerClassName`) and the [`CheckerRegistry`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod access;
pub mod error;
pub mod manager;
pub mod ownership;
pub mod registry;
pub mod scope_checker;
pub mod scope_data;
pub mod table;

mod proptests;

pub use access::{
    AccessChecker, AccessCheckerFactory, DefaultAccessChecker, ImportAccessChecker,
    UserAccessChecker,
};
pub use error::{Error, Result};
pub use manager::{AclManager, Realm};
pub use ownership::{
    DefaultOwnershipChecker, OwnershipChecker, OwnershipCheckerFactory,
    PortalAccountOwnershipChecker, PortalContactOwnershipChecker, PortalDefaultOwnershipChecker,
    PortalNotificationOwnershipChecker, UserOwnershipChecker,
};
pub use registry::{AccessCheckerConstructor, CheckerRegistry, OwnershipCheckerConstructor};
pub use scope_checker::{ScopeChecker, ScopeCheckerData, ScopeCheckerDataBuilder};
pub use scope_data::ScopeData;
pub use table::{Action, Level, Permission, PermissionTable, StaticTables, TableProvider};
