//! # espo-acl-cli
//!
//! Evaluate Espo ACL decisions from the command line.
//!
//! A TOML fixture ([`config::AclConfig`]) describes metadata, users with
//! their permission tables, records and stored relations. Commands load the
//! fixture, build an [`espo_acl::AclManager`] over it and report decisions:
//! - `check`: one action on one record
//! - `scope`: scope-level access
//! - `permission`: user-to-user permissions
//! - `level`: the raw level held for an action
//! - `validate`: fixture consistency

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::{Cli, Command};
pub use config::{AclConfig, Summary};
pub use error::{Error, Result};
