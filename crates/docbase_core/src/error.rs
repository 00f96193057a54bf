//! Error types for repository operations.

use docbase_store::StoreError;
use thiserror::Error;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors that can occur in repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No document exists for the requested identifier.
    #[error("entity not found: {key}")]
    NotFound {
        /// The store key that was requested.
        key: String,
    },

    /// The optimistic version check failed; nothing was written.
    ///
    /// A concurrent writer advanced the stored version after this entity
    /// was fetched. Re-fetch, re-apply the change, and save again.
    #[error("version mismatch on {key}: stored document was updated concurrently")]
    VersionMismatch {
        /// The store key whose save was rejected.
        key: String,
    },

    /// Store-level failure (transport, protocol, index, script).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Encoding or decoding a document failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The record type's designated fields could not be validated.
    ///
    /// Raised once at repository construction, never per-operation.
    #[error("invalid schema for {type_name}: {reason}")]
    Schema {
        /// Name of the record type.
        type_name: String,
        /// What the descriptor probe found wrong.
        reason: String,
    },
}

impl RepositoryError {
    /// Creates a not-found error for the given key.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates a version-mismatch error for the given key.
    pub fn version_mismatch(key: impl Into<String>) -> Self {
        Self::VersionMismatch { key: key.into() }
    }

    /// Creates a schema error for the given record type.
    pub fn schema(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is the missing-document outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }

    /// Returns true if this is the optimistic-check failure outcome.
    pub fn is_version_mismatch(&self) -> bool {
        matches!(self, RepositoryError::VersionMismatch { .. })
    }
}
