//! Store key and index name construction.

/// Builds the store key for an entity: `{prefix}:{id}`.
#[must_use]
pub fn entity_key(prefix: &str, id: &str) -> String {
    format!("{prefix}:{id}")
}

/// Builds the index name for a namespace prefix: `jsonidx:{prefix}`.
#[must_use]
pub fn index_name(prefix: &str) -> String {
    format!("jsonidx:{prefix}")
}
