//! espo-acl command-line entry point.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;

use espo_acl_cli::commands::{self, verdict};
use espo_acl_cli::config::CONFIG_ENV;
use espo_acl_cli::{AclConfig, Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = cli
        .config
        .with_context(|| format!("no fixture given; pass --config or set {CONFIG_ENV}"))?;
    let config = AclConfig::load(&path)?;
    tracing::debug!(path = %path.display(), realm = %config.realm, "fixture loaded");

    match cli.command {
        Command::Check {
            user,
            entity,
            action,
        } => {
            let allowed = commands::cmd_check(&config, &user, &entity, action)?;
            println!("{}", verdict(allowed));
        }
        Command::Scope {
            user,
            scope,
            action,
        } => {
            let allowed = commands::cmd_scope(&config, &user, &scope, action)?;
            println!("{}", verdict(allowed));
        }
        Command::Permission {
            user,
            target,
            permission,
        } => {
            let allowed = commands::cmd_permission(&config, &user, &target, permission)?;
            println!("{}", verdict(allowed));
        }
        Command::Level {
            user,
            scope,
            action,
        } => {
            let level = commands::cmd_level(&config, &user, &scope, action)?;
            println!("{level}");
        }
        Command::Validate => {
            let summary = commands::cmd_validate(&config)?;
            println!(
                "ok: {} scopes, {} users ({} with tables), {} records, {} relations",
                summary.scopes, summary.users, summary.tables, summary.records, summary.relations
            );
            if summary.unrecognized_levels > 0 {
                println!(
                    "{} unrecognized level tokens (read as none)",
                    summary.unrecognized_levels
                );
            }
        }
    }

    Ok(())
}
