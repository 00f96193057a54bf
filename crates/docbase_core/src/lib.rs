//! # docbase core
//!
//! Typed document repository with optimistic concurrency.
//!
//! This crate provides:
//! - [`Entity`] trait designating a record type's identifier and version
//!   fields
//! - [`Schema`] descriptor, probed and validated once per repository
//! - JSON codec between records and stored documents
//! - [`Repository`] façade: create, fetch (direct and cached), save,
//!   remove, index lifecycle, and search
//!
//! Saves run through a server-executed check-and-set on the version field,
//! so two writers racing on the same document cannot lose an update
//! silently: the slower writer gets [`RepositoryError::VersionMismatch`]
//! and must re-fetch before retrying.
//!
//! ```rust
//! use docbase_core::{Entity, Repository};
//! use docbase_store::{CancelToken, MemoryStore};
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct User {
//!     id: String,
//!     ver: u64,
//!     name: String,
//! }
//!
//! impl Entity for User {
//!     const ID_FIELD: &'static str = "id";
//!     const VERSION_FIELD: &'static str = "ver";
//!
//!     fn id(&self) -> &str {
//!         &self.id
//!     }
//!     fn assign_id(&mut self, id: String) {
//!         self.id = id;
//!     }
//!     fn version(&self) -> u64 {
//!         self.ver
//!     }
//!     fn set_version(&mut self, version: u64) {
//!         self.ver = version;
//!     }
//! }
//!
//! let repo: Repository<User, _> =
//!     Repository::new("user", Arc::new(MemoryStore::new())).unwrap();
//! let token = CancelToken::new();
//!
//! let mut user = repo.new_entity();
//! user.name = "alice".into();
//! repo.save(&token, &mut user).unwrap();
//! assert_eq!(user.ver, 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod codec;
mod entity;
mod error;
pub mod keys;
mod repository;
mod schema;

pub use codec::{decode, encode};
pub use entity::{generate_id, Entity};
pub use error::{RepositoryError, RepositoryResult};
pub use repository::Repository;
pub use schema::Schema;
