//! Document store trait definition.

use crate::cancel::CancelToken;
use crate::error::StoreResult;
use crate::index::IndexSchema;
use crate::query::{SearchQuery, SearchReply};
use crate::script::Script;
use std::time::Duration;

/// The command surface of a remote JSON-document store.
///
/// Implementations own connection management, pipelining, and the internals
/// of client-side caching; this trait only fixes the commands the repository
/// layer issues. Every operation is a single blocking request/response
/// exchange that observes the passed [`CancelToken`]: once the token trips,
/// the in-flight exchange aborts with a transport-kind error.
///
/// # Invariants
///
/// - `get`/`get_cached` return the whole serialized document or
///   `StoreError::NotFound`
/// - `delete` is idempotent; deleting a missing key succeeds
/// - `eval` executes the script indivisibly; no other command interleaves
///   with it
/// - Implementations must be `Send + Sync` for concurrent use
///
/// # Implementors
///
/// - [`super::MemoryStore`] - In-process store for tests and ephemeral use
pub trait DocumentStore: Send + Sync {
    /// Reads the whole document stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no document exists at the key, or a transport
    /// error if the exchange fails or is cancelled.
    fn get(&self, token: &CancelToken, key: &str) -> StoreResult<String>;

    /// Like [`get`](Self::get), but the result may be served from a
    /// client-side cache for up to `ttl`.
    ///
    /// Staleness up to `ttl` is an accepted trade-off for reduced store
    /// load. How (or whether) entries are invalidated before expiry is the
    /// implementation's concern.
    fn get_cached(&self, token: &CancelToken, key: &str, ttl: Duration) -> StoreResult<String>;

    /// Stores `document` at `key`, replacing any existing document.
    ///
    /// # Errors
    ///
    /// Returns `Document` if the body is not a JSON object, or a transport
    /// error if the exchange fails or is cancelled.
    fn put(&self, token: &CancelToken, key: &str, document: &str) -> StoreResult<()>;

    /// Deletes the document at `key`. Deleting a missing key succeeds.
    fn delete(&self, token: &CancelToken, key: &str) -> StoreResult<()>;

    /// Creates an index named `name` over documents whose key starts with
    /// `key_prefix`, with the given field layout.
    fn create_index(
        &self,
        token: &CancelToken,
        name: &str,
        key_prefix: &str,
        schema: &IndexSchema,
    ) -> StoreResult<()>;

    /// Drops the index named `name`.
    fn drop_index(&self, token: &CancelToken, name: &str) -> StoreResult<()>;

    /// Runs `query` against the index named `name`.
    ///
    /// The reply reports the total match count separately from the returned
    /// page of hits; hit order is the store's own ranking.
    fn search(
        &self,
        token: &CancelToken,
        name: &str,
        query: &SearchQuery,
    ) -> StoreResult<SearchReply>;

    /// Invokes a registered server-side script with the given keys and
    /// string arguments.
    ///
    /// Returns the script's reply, or `None` if the script completed with
    /// no value.
    ///
    /// # Errors
    ///
    /// Returns `UnknownScript` if the store does not recognize the script,
    /// or a transport error if the exchange fails or is cancelled.
    fn eval(
        &self,
        token: &CancelToken,
        script: &Script,
        keys: &[&str],
        args: &[&str],
    ) -> StoreResult<Option<String>>;
}
