//! Typed repository implementation.

use crate::codec;
use crate::entity::{generate_id, Entity};
use crate::error::{RepositoryError, RepositoryResult};
use crate::keys;
use crate::schema::Schema;
use docbase_store::{
    checked_save_script, CancelToken, DocumentStore, IndexSchema, SearchQuery, StoreError,
};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

/// A typed repository over one namespace prefix of a document store.
///
/// `Repository<T, S>` maps records of type `T` to JSON documents stored
/// under `{prefix}:{id}` keys, with one inverted index named
/// `jsonidx:{prefix}` covering the namespace. Updates go through a
/// server-executed check-and-set on the record's version field, so
/// concurrent writers cannot silently overwrite each other.
///
/// The repository holds no mutable state after construction - the schema
/// descriptor is read-only - and is safe for concurrent use. Every
/// operation is one blocking store exchange observing the passed
/// [`CancelToken`]; nothing is retried internally. [`NotFound`] and
/// [`VersionMismatch`] are expected, recoverable outcomes the caller
/// branches on; transport and serialization failures surface unchanged.
///
/// [`NotFound`]: RepositoryError::NotFound
/// [`VersionMismatch`]: RepositoryError::VersionMismatch
///
/// # Example
///
/// ```rust,ignore
/// use docbase_core::{Entity, Repository};
/// use docbase_store::{CancelToken, MemoryStore, SearchQuery};
/// use std::sync::Arc;
///
/// let repo: Repository<User, _> = Repository::new("user", Arc::new(MemoryStore::new()))?;
/// let token = CancelToken::new();
///
/// let mut user = repo.new_entity();
/// user.name = "alice".into();
/// repo.save(&token, &mut user)?;           // version becomes 1
///
/// let fetched = repo.fetch(&token, user.id())?;
/// let (total, users) = repo.search(&token, &SearchQuery::match_all())?;
/// ```
pub struct Repository<T: Entity, S: DocumentStore> {
    /// Namespace prefix for all keys of this repository.
    prefix: String,
    /// Name of the namespace's index.
    index: String,
    /// Validated field descriptor, probed once at construction.
    schema: Schema,
    /// The store client.
    store: Arc<S>,
    /// Type marker.
    _marker: PhantomData<T>,
}

impl<T: Entity, S: DocumentStore> Repository<T, S> {
    /// Creates a repository for records of type `T` under `prefix`.
    ///
    /// Probes and validates the record type's designated fields once; the
    /// resulting descriptor is reused by every operation.
    ///
    /// # Errors
    ///
    /// Returns a `Schema` error if the record type's identifier or version
    /// designation is missing, duplicated, or attached to an incompatible
    /// field kind.
    pub fn new(prefix: impl Into<String>, store: Arc<S>) -> RepositoryResult<Self> {
        let prefix = prefix.into();
        let schema = Schema::of::<T>()?;
        let index = keys::index_name(&prefix);
        Ok(Self {
            prefix,
            index,
            schema,
            store,
            _marker: PhantomData,
        })
    }

    /// Returns the namespace prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the name of the namespace's index.
    pub fn index_name(&self) -> &str {
        &self.index
    }

    /// Allocates a new entity with a freshly generated identifier.
    ///
    /// The version starts at zero and payload fields at their defaults.
    /// Nothing is stored until [`save`](Self::save); no network interaction
    /// happens here.
    pub fn new_entity(&self) -> T {
        let mut entity = T::default();
        entity.assign_id(generate_id());
        entity.set_version(0);
        entity
    }

    /// Fetches the entity with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no document exists for the identifier, a
    /// serialization error if the stored document does not decode, or a
    /// store error on transport failure.
    pub fn fetch(&self, token: &CancelToken, id: &str) -> RepositoryResult<T> {
        let key = keys::entity_key(&self.prefix, id);
        let body = self.store.get(token, &key).map_err(lift)?;
        codec::decode(&body)
    }

    /// Like [`fetch`](Self::fetch), but the read may be served from the
    /// store client's cache for up to `ttl`.
    ///
    /// Staleness up to `ttl` is an accepted trade-off for reduced store
    /// load.
    pub fn fetch_cached(
        &self,
        token: &CancelToken,
        id: &str,
        ttl: Duration,
    ) -> RepositoryResult<T> {
        let key = keys::entity_key(&self.prefix, id);
        let body = self.store.get_cached(token, &key, ttl).map_err(lift)?;
        codec::decode(&body)
    }

    /// Saves the entity with an optimistic version check.
    ///
    /// The whole entity, current in-memory version included, is handed to
    /// the store's atomic check-and-set procedure. On success the stored
    /// version is incremented by exactly one and written back into the
    /// entity. On a failed check nothing is mutated, here or in the store.
    ///
    /// # Errors
    ///
    /// Returns `VersionMismatch` if a concurrent writer advanced the stored
    /// version since this entity was fetched - re-fetch, re-apply the
    /// change, and save again; retrying the same call fails identically.
    /// Serialization and store errors propagate unchanged.
    pub fn save(&self, token: &CancelToken, entity: &mut T) -> RepositoryResult<()> {
        let key = keys::entity_key(&self.prefix, entity.id());
        let body = codec::encode(entity)?;
        let expected = entity.version().to_string();

        let reply = self
            .store
            .eval(
                token,
                checked_save_script(),
                &[&key],
                &[self.schema.version_field(), &expected, &body],
            )
            .map_err(lift)?;

        match reply {
            Some(version) => {
                let version = version.trim().parse::<u64>().map_err(|_| {
                    StoreError::Protocol(format!("non-numeric version reply: {version}"))
                })?;
                entity.set_version(version);
                Ok(())
            }
            None => Err(RepositoryError::version_mismatch(key)),
        }
    }

    /// Removes the document with the given identifier.
    ///
    /// Unconditional - no version check - and idempotent: removing an
    /// identifier that has no document succeeds. In-process instances of
    /// the entity remain valid.
    pub fn remove(&self, token: &CancelToken, id: &str) -> RepositoryResult<()> {
        let key = keys::entity_key(&self.prefix, id);
        self.store.delete(token, &key).map_err(lift)
    }

    /// Creates the namespace's index with the given field layout.
    ///
    /// The index covers documents whose key starts with `{prefix}:`. Field
    /// paths are forwarded untouched; a path that does not resolve inside
    /// stored documents is a caller error surfaced by the store.
    pub fn create_index(&self, token: &CancelToken, schema: &IndexSchema) -> RepositoryResult<()> {
        let key_prefix = format!("{}:", self.prefix);
        self.store
            .create_index(token, &self.index, &key_prefix, schema)
            .map_err(lift)
    }

    /// Drops the namespace's index.
    pub fn drop_index(&self, token: &CancelToken) -> RepositoryResult<()> {
        self.store.drop_index(token, &self.index).map_err(lift)
    }

    /// Runs a search against the namespace's index.
    ///
    /// Returns the store's total match count alongside the decoded page of
    /// results, in the store's own ranking order. Hits that do not carry
    /// the whole document (projections) are skipped. The total may exceed
    /// the number of returned entities when the query paginates or
    /// projects.
    ///
    /// # Errors
    ///
    /// Malformed queries are rejected before dispatch. A decode failure on
    /// any hit aborts the whole call; partial results are never returned.
    pub fn search(
        &self,
        token: &CancelToken,
        query: &SearchQuery,
    ) -> RepositoryResult<(u64, Vec<T>)> {
        query.validate().map_err(lift)?;
        let reply = self.store.search(token, &self.index, query).map_err(lift)?;

        let mut entities = Vec::with_capacity(reply.hits.len());
        for hit in &reply.hits {
            if let Some(document) = hit.document() {
                entities.push(codec::decode(document)?);
            }
        }
        Ok((reply.total, entities))
    }
}

/// Lifts store errors into the repository taxonomy.
///
/// Missing documents become the repository's own `NotFound`; everything
/// else passes through as a store error.
fn lift(err: StoreError) -> RepositoryError {
    match err {
        StoreError::NotFound { key } => RepositoryError::NotFound { key },
        other => RepositoryError::Store(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docbase_store::MemoryStore;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct User {
        id: String,
        #[serde(rename = "ver")]
        version: u64,
        name: String,
        age: u64,
    }

    impl Entity for User {
        const ID_FIELD: &'static str = "id";
        const VERSION_FIELD: &'static str = "ver";

        fn id(&self) -> &str {
            &self.id
        }
        fn assign_id(&mut self, id: String) {
            self.id = id;
        }
        fn version(&self) -> u64 {
            self.version
        }
        fn set_version(&mut self, version: u64) {
            self.version = version;
        }
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Broken {
        id: String,
    }

    impl Entity for Broken {
        const ID_FIELD: &'static str = "id";
        const VERSION_FIELD: &'static str = "ver";

        fn id(&self) -> &str {
            &self.id
        }
        fn assign_id(&mut self, id: String) {
            self.id = id;
        }
        fn version(&self) -> u64 {
            0
        }
        fn set_version(&mut self, _version: u64) {}
    }

    fn repo() -> Repository<User, MemoryStore> {
        Repository::new("user", Arc::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn construction_probes_the_schema() {
        let result: RepositoryResult<Repository<Broken, MemoryStore>> =
            Repository::new("broken", Arc::new(MemoryStore::new()));
        assert!(matches!(result, Err(RepositoryError::Schema { .. })));
    }

    #[test]
    fn names_follow_the_prefix() {
        let repo = repo();
        assert_eq!(repo.prefix(), "user");
        assert_eq!(repo.index_name(), "jsonidx:user");
    }

    #[test]
    fn new_entity_has_id_and_zero_version() {
        let repo = repo();
        let user = repo.new_entity();
        assert_eq!(user.id().len(), 26);
        assert_eq!(user.version(), 0);
        assert!(user.name.is_empty());

        let other = repo.new_entity();
        assert_ne!(user.id(), other.id());
    }

    #[test]
    fn save_then_fetch_roundtrips() {
        let repo = repo();
        let token = CancelToken::new();

        let mut user = repo.new_entity();
        user.name = "alice".into();
        user.age = 30;
        repo.save(&token, &mut user).unwrap();
        assert_eq!(user.version(), 1);

        let fetched = repo.fetch(&token, user.id()).unwrap();
        assert_eq!(fetched, user);
    }

    #[test]
    fn fetch_unknown_id_is_not_found() {
        let repo = repo();
        let err = repo.fetch(&CancelToken::new(), "missing").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn stale_copy_cannot_overwrite() {
        let repo = repo();
        let token = CancelToken::new();

        let mut user = repo.new_entity();
        user.name = "a".into();
        repo.save(&token, &mut user).unwrap();

        let mut copy1 = repo.fetch(&token, user.id()).unwrap();
        let mut copy2 = repo.fetch(&token, user.id()).unwrap();

        copy1.name = "b".into();
        repo.save(&token, &mut copy1).unwrap();

        copy2.name = "c".into();
        let err = repo.save(&token, &mut copy2).unwrap_err();
        assert!(err.is_version_mismatch());
        // The losing copy keeps its stale version; re-fetching shows the
        // winner's write.
        assert_eq!(copy2.version(), 1);
        let current = repo.fetch(&token, user.id()).unwrap();
        assert_eq!(current.name, "b");
        assert_eq!(current.version(), 2);
    }

    #[test]
    fn remove_is_idempotent_and_fetch_reports_not_found() {
        let repo = repo();
        let token = CancelToken::new();

        let mut user = repo.new_entity();
        repo.save(&token, &mut user).unwrap();

        repo.remove(&token, user.id()).unwrap();
        repo.remove(&token, user.id()).unwrap();

        let err = repo.fetch(&token, user.id()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn search_decodes_whole_documents() {
        let repo = repo();
        let token = CancelToken::new();
        repo.create_index(
            &token,
            &IndexSchema::new().text("$.name", "name").numeric("$.age", "age"),
        )
        .unwrap();

        let mut alice = repo.new_entity();
        alice.name = "alice".into();
        alice.age = 30;
        repo.save(&token, &mut alice).unwrap();

        let mut bob = repo.new_entity();
        bob.name = "bob".into();
        bob.age = 25;
        repo.save(&token, &mut bob).unwrap();

        let (total, users) = repo
            .search(&token, &SearchQuery::new("@name:alice"))
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(users.len(), 1);
        assert_eq!(users[0], repo.fetch(&token, alice.id()).unwrap());
    }

    #[test]
    fn search_skips_projected_hits() {
        let repo = repo();
        let token = CancelToken::new();
        repo.create_index(&token, &IndexSchema::new().text("$.name", "name"))
            .unwrap();

        let mut user = repo.new_entity();
        user.name = "alice".into();
        repo.save(&token, &mut user).unwrap();

        let (total, users) = repo
            .search(&token, &SearchQuery::match_all().return_field("name"))
            .unwrap();
        assert_eq!(total, 1);
        assert!(users.is_empty());
    }

    #[test]
    fn cancelled_token_surfaces_as_store_error() {
        let repo = repo();
        let token = CancelToken::new();
        token.cancel();

        let err = repo.fetch(&token, "any").unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Store(StoreError::Transport { .. })
        ));
    }
}
