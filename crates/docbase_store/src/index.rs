//! Index schema construction.

use serde::{Deserialize, Serialize};

/// How a field is indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Full-text field.
    Text,
    /// Numeric field supporting range queries.
    Numeric,
    /// Exact-match tag field.
    Tag,
}

/// One indexed field.
///
/// `path` addresses the field inside the stored JSON document using JSON
/// path syntax (e.g. `$.name`); `alias` is the name queries refer to it by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexField {
    /// JSON path of the field inside the document.
    pub path: String,
    /// Query-facing name of the field.
    pub alias: String,
    /// How the field is indexed.
    pub kind: FieldKind,
}

/// Field layout for an index, built with chainable constructors.
///
/// The repository forwards the schema to the store untouched; a field path
/// that does not resolve inside stored documents is a caller error surfaced
/// by the store.
///
/// # Example
///
/// ```rust
/// use docbase_store::IndexSchema;
///
/// let schema = IndexSchema::new()
///     .text("$.name", "name")
///     .numeric("$.age", "age")
///     .tag("$.country", "country");
/// assert_eq!(schema.fields().len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSchema {
    fields: Vec<IndexField>,
}

impl IndexSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a full-text field.
    #[must_use]
    pub fn text(self, path: impl Into<String>, alias: impl Into<String>) -> Self {
        self.field(path, alias, FieldKind::Text)
    }

    /// Adds a numeric field.
    #[must_use]
    pub fn numeric(self, path: impl Into<String>, alias: impl Into<String>) -> Self {
        self.field(path, alias, FieldKind::Numeric)
    }

    /// Adds an exact-match tag field.
    #[must_use]
    pub fn tag(self, path: impl Into<String>, alias: impl Into<String>) -> Self {
        self.field(path, alias, FieldKind::Tag)
    }

    fn field(mut self, path: impl Into<String>, alias: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(IndexField {
            path: path.into(),
            alias: alias.into(),
            kind,
        });
        self
    }

    /// Returns the indexed fields in declaration order.
    pub fn fields(&self) -> &[IndexField] {
        &self.fields
    }

    /// Returns true if no fields have been declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field by its query-facing alias.
    pub fn field_by_alias(&self, alias: &str) -> Option<&IndexField> {
        self.fields.iter().find(|f| f.alias == alias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_order_is_kept() {
        let schema = IndexSchema::new()
            .numeric("$.age", "age")
            .text("$.name", "name");

        let fields = schema.fields();
        assert_eq!(fields[0].alias, "age");
        assert_eq!(fields[0].kind, FieldKind::Numeric);
        assert_eq!(fields[1].alias, "name");
        assert_eq!(fields[1].kind, FieldKind::Text);
    }

    #[test]
    fn lookup_by_alias() {
        let schema = IndexSchema::new().tag("$.country", "country");
        assert!(schema.field_by_alias("country").is_some());
        assert!(schema.field_by_alias("$.country").is_none());
    }

    #[test]
    fn empty_schema() {
        assert!(IndexSchema::new().is_empty());
    }
}
