//! Error types for espo-acl

use thiserror::Error;

/// Result type alias for espo-acl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in espo-acl.
///
/// Access denial is not an error: checks return `Ok(false)`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from espo-core, including record store lookups
    #[error("Core error: {0}")]
    Core(#[from] espo_core::Error),

    /// No checker is registered for the scope and the scope itself is unknown
    #[error("No ACL implementation for scope '{scope}'")]
    NotImplemented {
        /// Scope that was requested
        scope: String,
    },

    /// Metadata names an implementation the registry does not know
    #[error("Scope '{scope}' refers to unknown ACL implementation '{name}'")]
    UnknownImplementation {
        /// Scope whose metadata holds the override
        scope: String,
        /// Implementation name found in metadata
        name: String,
    },

    /// Raw scope data has an unsupported shape
    #[error("Invalid scope data: {0}")]
    InvalidScopeData(String),

    /// No permission table could be produced for the user
    #[error("No permission table for user '{user_id}'")]
    NoTable {
        /// User ID
        user_id: String,
    },
}

impl Error {
    /// Creates a `NotImplemented` error.
    pub fn not_implemented(scope: impl Into<String>) -> Self {
        Error::NotImplemented {
            scope: scope.into(),
        }
    }

    /// Whether the scope has no ACL implementation at all.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Error::NotImplemented { .. })
    }

    /// Whether the error came from the record store rather than from
    /// configuration.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, Error::Core(e) if e.is_lookup())
    }
}
