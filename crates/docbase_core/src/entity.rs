//! Entity trait for repository-managed record types.

use serde::de::DeserializeOwned;
use serde::Serialize;
use ulid::Ulid;

/// Trait for record types managed by a [`Repository`](crate::Repository).
///
/// Implementors designate exactly one identifier field and exactly one
/// version field via the associated constants, naming them as they appear
/// in the serialized JSON document (after any serde renames). The accessor
/// pairs give the repository typed access to those two fields; everything
/// else in the record is payload the repository never inspects.
///
/// The identifier is assigned at creation and never reassigned. The version
/// is server-authoritative: it starts at zero and is only ever overwritten
/// with the value returned by a successful save.
///
/// # Example
///
/// ```rust
/// use docbase_core::Entity;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// struct User {
///     id: String,
///     #[serde(rename = "ver")]
///     version: u64,
///     name: String,
/// }
///
/// impl Entity for User {
///     const ID_FIELD: &'static str = "id";
///     const VERSION_FIELD: &'static str = "ver";
///
///     fn id(&self) -> &str {
///         &self.id
///     }
///
///     fn assign_id(&mut self, id: String) {
///         self.id = id;
///     }
///
///     fn version(&self) -> u64 {
///         self.version
///     }
///
///     fn set_version(&mut self, version: u64) {
///         self.version = version;
///     }
/// }
/// ```
pub trait Entity: Serialize + DeserializeOwned + Default {
    /// On-document name of the identifier field.
    const ID_FIELD: &'static str;

    /// On-document name of the version field.
    ///
    /// This is also the field path the save procedure's version check
    /// addresses inside the stored document.
    const VERSION_FIELD: &'static str;

    /// Returns the entity's identifier.
    fn id(&self) -> &str;

    /// Assigns the identifier. Called once at creation.
    fn assign_id(&mut self, id: String);

    /// Returns the entity's version.
    fn version(&self) -> u64;

    /// Overwrites the version with a server-returned value.
    fn set_version(&mut self, version: u64);
}

/// Generates a fresh entity identifier.
///
/// Identifiers are ULID strings: collision-resistant and lexicographically
/// sortable by creation time, so key order within a prefix follows insertion
/// order.
#[must_use]
pub fn generate_id() -> String {
    Ulid::new().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
    }

    #[test]
    fn generated_ids_have_ulid_shape() {
        let id = generate_id();
        assert_eq!(id.len(), 26);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_ids_sort_by_creation_time() {
        let earlier = generate_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let later = generate_id();
        assert!(earlier < later);
    }
}
