//! Error taxonomy shared by the engine and every [`Store`](crate::store::Store)
//! implementation.
//!
//! Lookups that miss are not errors: stores return `Ok(None)`. Everything
//! the engine rejects surfaces as one of the variants below, and no
//! operation commits anything before it fails.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the engine and storage backends.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller-supplied data is malformed or empty.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced identifier does not resolve.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The supplied entities exist but do not belong together.
    #[error("referential integrity error: {0}")]
    ReferentialIntegrity(String),

    /// The suggestion provider failed or produced nothing usable.
    #[error("provider error: {0}")]
    Provider(String),

    /// Backend failure (I/O, lock poisoning, remote store).
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Stable, machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::NotFound { .. } => "not_found",
            Error::ReferentialIntegrity(_) => "referential_integrity",
            Error::Provider(_) => "provider",
            Error::Storage(_) => "storage",
            Error::Serialization(_) => "serialization",
        }
    }
}
