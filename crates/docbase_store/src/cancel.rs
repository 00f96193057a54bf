//! Cancellation handle for in-flight store operations.

use crate::error::{StoreError, StoreResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cancellation signal shared between a caller and an in-flight operation.
///
/// Cloning is cheap; all clones observe the same flag. Store implementations
/// check the token before (and, where possible, during) each network
/// exchange and abort with a transport-kind error once it trips.
///
/// A triggered token stays triggered: create a fresh token per logical
/// operation or batch of operations.
///
/// # Example
///
/// ```rust
/// use docbase_store::CancelToken;
///
/// let token = CancelToken::new();
/// let handle = token.clone();
/// assert!(!token.is_cancelled());
///
/// handle.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.check().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a new, untriggered token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Triggers the token, aborting any operation that observes it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true if the token has been triggered.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns the cancellation error if the token has been triggered.
    pub fn check(&self) -> StoreResult<()> {
        if self.is_cancelled() {
            Err(StoreError::cancelled())
        } else {
            Ok(())
        }
    }
}
