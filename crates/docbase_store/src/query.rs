//! Search queries and replies.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};

/// Field name under which a search hit carries the whole document.
pub const DOCUMENT_FIELD: &str = "$";

/// Sort direction for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending field order.
    Ascending,
    /// Descending field order.
    Descending,
}

/// A search query, built with chainable constructors.
///
/// The filter expression is passed to the store verbatim; only the store
/// defines its full syntax. Without a projection, every hit carries the
/// whole document under [`DOCUMENT_FIELD`]; with one, hits carry only the
/// requested fields.
///
/// # Example
///
/// ```rust
/// use docbase_store::{SearchQuery, SortOrder};
///
/// let query = SearchQuery::new("@country:{de}")
///     .sort_by("age", SortOrder::Descending)
///     .page(0, 20);
/// assert!(query.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    filter: String,
    offset: u64,
    limit: Option<u64>,
    sort: Option<(String, SortOrder)>,
    return_fields: Vec<String>,
}

impl SearchQuery {
    /// Creates a query with the given filter expression.
    #[must_use]
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            offset: 0,
            limit: None,
            sort: None,
            return_fields: Vec::new(),
        }
    }

    /// Creates a query matching every document in the index.
    #[must_use]
    pub fn match_all() -> Self {
        Self::new("*")
    }

    /// Restricts results to a page window.
    #[must_use]
    pub fn page(mut self, offset: u64, limit: u64) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    /// Sorts results by an indexed field.
    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some((field.into(), order));
        self
    }

    /// Projects a single field into the hits instead of the whole document.
    ///
    /// May be called repeatedly to project several fields.
    #[must_use]
    pub fn return_field(mut self, field: impl Into<String>) -> Self {
        self.return_fields.push(field.into());
        self
    }

    /// Checks the query before dispatch.
    pub fn validate(&self) -> StoreResult<()> {
        if self.filter.trim().is_empty() {
            return Err(StoreError::InvalidQuery(
                "empty filter expression".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the filter expression.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Returns the page offset.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the page size, if bounded.
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Returns the sort field and direction, if any.
    pub fn sort(&self) -> Option<(&str, SortOrder)> {
        self.sort.as_ref().map(|(f, o)| (f.as_str(), *o))
    }

    /// Returns the projected fields; empty means whole documents.
    pub fn return_fields(&self) -> &[String] {
        &self.return_fields
    }
}

/// One search hit: the document key plus returned fields in store order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Store key of the matching document.
    pub key: String,
    /// Returned (name, value) pairs.
    pub fields: Vec<(String, String)>,
}

impl SearchHit {
    /// Returns the whole-document payload, if this hit carries one.
    pub fn document(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == DOCUMENT_FIELD)
            .map(|(_, value)| value.as_str())
    }
}

/// A search reply: total match count plus the returned page of hits.
///
/// `total` counts every match inside the store and may exceed `hits.len()`
/// when the query paginates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReply {
    /// Total number of matches in the store.
    pub total: u64,
    /// Returned hits, in store ranking order.
    pub hits: Vec<SearchHit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_all_filter() {
        let query = SearchQuery::match_all();
        assert_eq!(query.filter(), "*");
        assert!(query.validate().is_ok());
    }

    #[test]
    fn empty_filter_is_rejected() {
        let query = SearchQuery::new("   ");
        assert!(matches!(
            query.validate(),
            Err(StoreError::InvalidQuery(_))
        ));
    }

    #[test]
    fn builder_accumulates_clauses() {
        let query = SearchQuery::new("@name:alice")
            .page(10, 5)
            .sort_by("age", SortOrder::Ascending)
            .return_field("name")
            .return_field("age");

        assert_eq!(query.offset(), 10);
        assert_eq!(query.limit(), Some(5));
        assert_eq!(query.sort(), Some(("age", SortOrder::Ascending)));
        assert_eq!(query.return_fields(), ["name", "age"]);
    }

    #[test]
    fn hit_document_lookup() {
        let hit = SearchHit {
            key: "user:1".into(),
            fields: vec![(DOCUMENT_FIELD.into(), "{}".into())],
        };
        assert_eq!(hit.document(), Some("{}"));

        let projected = SearchHit {
            key: "user:2".into(),
            fields: vec![("name".into(), "alice".into())],
        };
        assert_eq!(projected.document(), None);
    }
}
