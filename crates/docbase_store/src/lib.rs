//! # docbase store
//!
//! Store command surface for docbase.
//!
//! This crate fixes the boundary between the typed repository layer and the
//! remote JSON-document store: the [`DocumentStore`] command trait, the
//! store error taxonomy, cancellation, the server-side [`Script`] handle,
//! index/query builders, and search reply types.
//!
//! ## Design Principles
//!
//! - The trait carries commands, not connections - pooling, pipelining, and
//!   cache internals belong to implementations
//! - Every operation is one blocking request/response exchange observing a
//!   [`CancelToken`]
//! - The check-and-set save procedure is registered once per process and
//!   shared by every client
//!
//! ## Available Stores
//!
//! - [`MemoryStore`] - In-process store for tests and ephemeral use
//!
//! ## Example
//!
//! ```rust
//! use docbase_store::{CancelToken, DocumentStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let token = CancelToken::new();
//! store.put(&token, "user:1", r#"{"name":"alice"}"#).unwrap();
//! assert!(store.get(&token, "user:1").unwrap().contains("alice"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cancel;
mod error;
mod index;
mod memory;
mod query;
mod script;
mod store;

pub use cancel::CancelToken;
pub use error::{StoreError, StoreResult};
pub use index::{FieldKind, IndexField, IndexSchema};
pub use memory::MemoryStore;
pub use query::{SearchHit, SearchQuery, SearchReply, SortOrder, DOCUMENT_FIELD};
pub use script::{checked_save_script, Script};
pub use store::DocumentStore;
