//! Error types for store operations.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document exists at the requested key.
    #[error("no document at key: {key}")]
    NotFound {
        /// The key that was requested.
        key: String,
    },

    /// Network, timeout, or cancellation failure.
    ///
    /// The operation's effect on the store is unknown and must be treated
    /// as possibly-not-applied.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// The search query is malformed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The named index does not exist.
    #[error("unknown index: {name}")]
    UnknownIndex {
        /// Name of the index.
        name: String,
    },

    /// The store does not recognize the requested script.
    #[error("unknown script: {digest}")]
    UnknownScript {
        /// Hex digest of the script that was requested.
        digest: String,
    },

    /// The store returned a reply the client could not interpret.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The store rejected a document body.
    #[error("invalid document: {0}")]
    Document(String),
}

impl StoreError {
    /// Creates a not-found error for the given key.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Creates the transport error reported for a cancelled operation.
    ///
    /// Cancellation is deliberately the same kind as a network failure:
    /// the caller cannot tell whether the operation reached the store.
    pub fn cancelled() -> Self {
        Self::transport_fatal("operation cancelled")
    }

    /// Returns true if this error can be retried as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Transport { retryable: true, .. })
    }

    /// Returns true if this error is a missing-document outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(StoreError::transport_retryable("connection reset").is_retryable());
        assert!(!StoreError::transport_fatal("bad certificate").is_retryable());
        assert!(!StoreError::cancelled().is_retryable());
        assert!(!StoreError::not_found("user:1").is_retryable());
    }

    #[test]
    fn cancellation_is_transport_kind() {
        assert!(matches!(
            StoreError::cancelled(),
            StoreError::Transport { .. }
        ));
    }

    #[test]
    fn error_display() {
        let err = StoreError::not_found("user:01H");
        assert_eq!(err.to_string(), "no document at key: user:01H");

        let err = StoreError::UnknownIndex {
            name: "jsonidx:user".into(),
        };
        assert!(err.to_string().contains("jsonidx:user"));
    }
}
