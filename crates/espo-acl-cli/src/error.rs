//! Error types for espo-acl-cli

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for espo-acl-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in espo-acl-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from espo-acl
    #[error(transparent)]
    Acl(#[from] espo_acl::Error),

    /// Error from espo-core
    #[error(transparent)]
    Core(#[from] espo_core::Error),

    /// Fixture file could not be read
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        /// Fixture path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Fixture is not valid TOML or has the wrong shape
    #[error("Invalid fixture: {0}")]
    Fixture(#[from] toml::de::Error),

    /// No user with the ID in the fixture
    #[error("Unknown user '{0}'")]
    UnknownUser(String),

    /// No record with the type and ID in the fixture
    #[error("Unknown record {entity_type}:{id}")]
    UnknownRecord {
        /// Entity type
        entity_type: String,
        /// Record ID
        id: String,
    },

    /// A `TYPE:ID` argument is malformed
    #[error("Invalid entity reference '{0}', expected TYPE:ID")]
    InvalidEntityRef(String),
}

impl Error {
    /// Creates an `Io` error for a path.
    pub fn io_with_path(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
