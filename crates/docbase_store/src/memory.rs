//! In-memory document store for testing.

use crate::cancel::CancelToken;
use crate::error::{StoreError, StoreResult};
use crate::index::IndexSchema;
use crate::query::{SearchHit, SearchQuery, SearchReply, SortOrder, DOCUMENT_FIELD};
use crate::script::{checked_save_script, Script};
use crate::store::DocumentStore;
use parking_lot::RwLock;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use tracing::debug;

struct CachedRead {
    body: String,
    expires_at: Instant,
}

struct IndexDef {
    key_prefix: String,
    schema: IndexSchema,
}

/// An in-memory document store.
///
/// This store holds parsed JSON documents in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral repositories that don't need a remote store
///
/// The full command surface is implemented. The check-and-set save script
/// executes natively under the document-table write lock, which makes it
/// indivisible exactly as a remote store's script engine would; scripts
/// other than the registered one are rejected. Search understands the
/// match-all filter (`*`) and whitespace-separated exact `@field:value`
/// terms over top-level document fields. Cached reads expire passively.
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use docbase_store::{CancelToken, DocumentStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// let token = CancelToken::new();
/// store.put(&token, "user:1", r#"{"name":"alice"}"#).unwrap();
/// let body = store.get(&token, "user:1").unwrap();
/// assert!(body.contains("alice"));
/// ```
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<BTreeMap<String, Value>>,
    cache: RwLock<HashMap<String, CachedRead>>,
    indexes: RwLock<HashMap<String, IndexDef>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Returns true if no documents are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Returns the serialized document at `key`, if present.
    ///
    /// Bypasses the read cache; useful for asserting stored state in tests.
    #[must_use]
    pub fn raw_document(&self, key: &str) -> Option<String> {
        self.documents
            .read()
            .get(key)
            .map(|doc| doc.to_string())
    }

    /// Clears all documents, cached reads, and indexes.
    pub fn clear(&self) {
        self.documents.write().clear();
        self.cache.write().clear();
        self.indexes.write().clear();
    }

    fn read_serialized(&self, key: &str) -> StoreResult<String> {
        self.documents
            .read()
            .get(key)
            .map(|doc| doc.to_string())
            .ok_or_else(|| StoreError::not_found(key))
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, token: &CancelToken, key: &str) -> StoreResult<String> {
        token.check()?;
        self.read_serialized(key)
    }

    fn get_cached(&self, token: &CancelToken, key: &str, ttl: Duration) -> StoreResult<String> {
        token.check()?;
        let now = Instant::now();
        if let Some(entry) = self.cache.read().get(key) {
            if entry.expires_at > now {
                return Ok(entry.body.clone());
            }
        }

        let body = self.read_serialized(key)?;
        self.cache.write().insert(
            key.to_string(),
            CachedRead {
                body: body.clone(),
                expires_at: now + ttl,
            },
        );
        Ok(body)
    }

    fn put(&self, token: &CancelToken, key: &str, document: &str) -> StoreResult<()> {
        token.check()?;
        let doc = parse_document(document)?;
        self.documents.write().insert(key.to_string(), doc);
        Ok(())
    }

    fn delete(&self, token: &CancelToken, key: &str) -> StoreResult<()> {
        token.check()?;
        self.documents.write().remove(key);
        Ok(())
    }

    fn create_index(
        &self,
        token: &CancelToken,
        name: &str,
        key_prefix: &str,
        schema: &IndexSchema,
    ) -> StoreResult<()> {
        token.check()?;
        if schema.is_empty() {
            return Err(StoreError::InvalidQuery(
                "index schema declares no fields".to_string(),
            ));
        }
        debug!(name, key_prefix, fields = schema.fields().len(), "creating index");
        self.indexes.write().insert(
            name.to_string(),
            IndexDef {
                key_prefix: key_prefix.to_string(),
                schema: schema.clone(),
            },
        );
        Ok(())
    }

    fn drop_index(&self, token: &CancelToken, name: &str) -> StoreResult<()> {
        token.check()?;
        self.indexes.write().remove(name);
        Ok(())
    }

    fn search(
        &self,
        token: &CancelToken,
        name: &str,
        query: &SearchQuery,
    ) -> StoreResult<SearchReply> {
        token.check()?;
        query.validate()?;

        let indexes = self.indexes.read();
        let def = indexes
            .get(name)
            .ok_or_else(|| StoreError::UnknownIndex { name: name.into() })?;

        let docs = self.documents.read();
        let mut matched: Vec<(&String, &Value)> = Vec::new();
        for (key, doc) in docs.iter() {
            if !key.starts_with(&def.key_prefix) {
                continue;
            }
            if filter_matches(query.filter(), doc, &def.schema)? {
                matched.push((key, doc));
            }
        }

        if let Some((field, order)) = query.sort() {
            let sort_field = def.schema.field_by_alias(field).ok_or_else(|| {
                StoreError::InvalidQuery(format!("unknown sort field: {field}"))
            })?;
            let path = sort_field.path.clone();
            matched.sort_by(|a, b| compare_fields(a.1, b.1, &path));
            if order == SortOrder::Descending {
                matched.reverse();
            }
        }

        let total = matched.len() as u64;
        let offset = query.offset() as usize;
        let limit = query.limit().map(|l| l as usize).unwrap_or(usize::MAX);

        let mut hits = Vec::new();
        for (key, doc) in matched.into_iter().skip(offset).take(limit) {
            let fields = if query.return_fields().is_empty() {
                vec![(DOCUMENT_FIELD.to_string(), doc.to_string())]
            } else {
                projected_fields(doc, query.return_fields(), &def.schema)
            };
            hits.push(SearchHit {
                key: key.clone(),
                fields,
            });
        }

        Ok(SearchReply { total, hits })
    }

    fn eval(
        &self,
        token: &CancelToken,
        script: &Script,
        keys: &[&str],
        args: &[&str],
    ) -> StoreResult<Option<String>> {
        token.check()?;
        if script.digest() != checked_save_script().digest() {
            return Err(StoreError::UnknownScript {
                digest: script.digest_hex(),
            });
        }
        if keys.len() != 1 || args.len() != 3 {
            return Err(StoreError::Protocol(
                "checked save expects 1 key and 3 arguments".to_string(),
            ));
        }
        let (key, field, expected, body) = (keys[0], args[0], args[1], args[2]);
        let mut doc = parse_document(body)?;

        // Indivisible: the read, compare, replace, and increment all happen
        // under one write lock of the document table.
        let mut docs = self.documents.write();
        let unchanged = match docs.get(key).and_then(|d| d.get(path_leaf(field))) {
            None => true,
            Some(stored) => stored.to_string() == expected,
        };
        if !unchanged {
            debug!(key, "version check failed");
            return Ok(None);
        }

        let slot = doc.get_mut(path_leaf(field));
        let version = match slot {
            Some(Value::Number(n)) => n.as_u64(),
            _ => None,
        }
        .ok_or_else(|| {
            StoreError::Document(format!("version field '{field}' missing or not an integer"))
        })?;

        let next = version + 1;
        doc[path_leaf(field)] = Value::from(next);
        docs.insert(key.to_string(), doc);
        Ok(Some(next.to_string()))
    }
}

fn parse_document(body: &str) -> StoreResult<Value> {
    let doc: Value =
        serde_json::from_str(body).map_err(|e| StoreError::Document(e.to_string()))?;
    if !doc.is_object() {
        return Err(StoreError::Document("expected a JSON object".to_string()));
    }
    Ok(doc)
}

/// Strips the JSON path prefix; only top-level fields are addressable here.
fn path_leaf(path: &str) -> &str {
    path.strip_prefix("$.").unwrap_or(path)
}

fn filter_matches(filter: &str, doc: &Value, schema: &IndexSchema) -> StoreResult<bool> {
    let filter = filter.trim();
    if filter == "*" {
        return Ok(true);
    }
    for term in filter.split_whitespace() {
        let rest = term.strip_prefix('@').ok_or_else(|| {
            StoreError::InvalidQuery(format!("unsupported term: {term}"))
        })?;
        let (alias, wanted) = rest.split_once(':').ok_or_else(|| {
            StoreError::InvalidQuery(format!("unsupported term: {term}"))
        })?;
        let field = schema.field_by_alias(alias).ok_or_else(|| {
            StoreError::InvalidQuery(format!("unknown field: {alias}"))
        })?;
        // Tag terms may come wrapped in braces.
        let wanted = wanted
            .strip_prefix('{')
            .and_then(|w| w.strip_suffix('}'))
            .unwrap_or(wanted);
        match doc.get(path_leaf(&field.path)) {
            Some(actual) if field_text(actual) == wanted => {}
            _ => return Ok(false),
        }
    }
    Ok(true)
}

fn projected_fields(
    doc: &Value,
    names: &[String],
    schema: &IndexSchema,
) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    for name in names {
        let path = schema
            .field_by_alias(name)
            .map(|f| f.path.as_str())
            .unwrap_or(name);
        if let Some(value) = doc.get(path_leaf(path)) {
            fields.push((name.clone(), field_text(value)));
        }
    }
    fields
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare_fields(a: &Value, b: &Value, path: &str) -> Ordering {
    let (a, b) = (a.get(path_leaf(path)), b.get(path_leaf(path)));
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or_default(), y.as_f64().unwrap_or_default());
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
