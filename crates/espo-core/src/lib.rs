//! Espo Core: the collaborators the ACL pipeline reads from.
//!
//! This crate provides the record-side types used by `espo-acl`. It has no
//! internal dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`entity`]: The [`Entity`] view and the generic [`Record`]
//! - [`user`]: The acting [`User`] and [`UserType`] tiers
//! - [`metadata`]: The [`Metadata`] tree (`scopes`, `aclDefs`)
//! - [`relations`]: [`RelationLookup`] and an in-memory store

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod entity;
pub mod error;
pub mod metadata;
pub mod relations;
pub mod user;

// Re-export key types at crate root for convenience
pub use entity::{Entity, Record};
pub use error::{Error, Result};
pub use metadata::Metadata;
pub use relations::{InMemoryRelations, Relation, RelationLookup};
pub use user::{User, UserType};
