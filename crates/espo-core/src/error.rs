//! Error types for espo-core

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for espo-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in espo-core
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Configuration or metadata is malformed
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error with the path that was being accessed
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A relation lookup against the record store failed
    #[error("Lookup of {entity_type}.{link} for '{id}' failed: {message}")]
    Lookup {
        /// Entity type the lookup started from
        entity_type: String,
        /// Entity ID the lookup started from
        id: String,
        /// Relation name
        link: String,
        /// What went wrong
        message: String,
    },

    /// An attribute holds a value of the wrong shape
    #[error("Invalid attribute '{attribute}' on {entity_type}: {message}")]
    InvalidAttribute {
        /// Entity type carrying the attribute
        entity_type: String,
        /// Attribute name
        attribute: String,
        /// What went wrong
        message: String,
    },
}

impl Error {
    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Wraps an I/O error together with the path it occurred on.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a new relation lookup error.
    pub fn lookup(
        entity_type: impl Into<String>,
        id: impl Into<String>,
        link: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Lookup {
            entity_type: entity_type.into(),
            id: id.into(),
            link: link.into(),
            message: message.into(),
        }
    }

    /// Whether the error came from a collaborator (record store) rather than
    /// from configuration.
    pub fn is_lookup(&self) -> bool {
        matches!(self, Error::Lookup { .. })
    }
}
