//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use espo_acl::{Action, Permission};

use crate::commands::EntityRef;
use crate::config::CONFIG_ENV;

/// Evaluate Espo ACL decisions against a TOML fixture
#[derive(Parser, Debug)]
#[command(name = "espo-acl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Fixture file path
    #[arg(short, long, env = CONFIG_ENV, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Decide one action on one record
    Check {
        /// Acting user ID
        #[arg(long)]
        user: String,
        /// Record as TYPE:ID
        #[arg(long)]
        entity: EntityRef,
        /// Action (create, read, edit, delete, stream)
        #[arg(long)]
        action: Action,
    },
    /// Decide scope-level access
    Scope {
        /// Acting user ID
        #[arg(long)]
        user: String,
        /// Scope name
        #[arg(long)]
        scope: String,
        /// Restrict the check to one action
        #[arg(long)]
        action: Option<Action>,
    },
    /// Decide a user-to-user permission
    Permission {
        /// Acting user ID
        #[arg(long)]
        user: String,
        /// Target user ID
        #[arg(long)]
        target: String,
        /// Permission name (assignment, user, message, ...)
        #[arg(long)]
        permission: Permission,
    },
    /// Show the level held for an action in a scope
    Level {
        /// Acting user ID
        #[arg(long)]
        user: String,
        /// Scope name
        #[arg(long)]
        scope: String,
        /// Action
        #[arg(long)]
        action: Action,
    },
    /// Load the fixture and report what it holds
    Validate,
}
