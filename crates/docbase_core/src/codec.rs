//! JSON codec for entities.

use crate::entity::Entity;
use crate::error::RepositoryResult;

/// Serializes the full entity, including identifier and version fields, to
/// its JSON document representation.
pub fn encode<T: Entity>(entity: &T) -> RepositoryResult<String> {
    Ok(serde_json::to_string(entity)?)
}

/// Deserializes a document into a freshly allocated entity.
///
/// Every call produces a new instance; no existing value is ever mutated,
/// so the caller owns the result exclusively.
pub fn decode<T: Entity>(document: &str) -> RepositoryResult<T> {
    Ok(serde_json::from_str(document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        ver: u64,
        title: String,
        pinned: bool,
        tags: Vec<String>,
    }

    impl Entity for Note {
        const ID_FIELD: &'static str = "id";
        const VERSION_FIELD: &'static str = "ver";

        fn id(&self) -> &str {
            &self.id
        }
        fn assign_id(&mut self, id: String) {
            self.id = id;
        }
        fn version(&self) -> u64 {
            self.ver
        }
        fn set_version(&mut self, version: u64) {
            self.ver = version;
        }
    }

    #[test]
    fn decode_allocates_fresh_instances() {
        let note = Note {
            id: "01H".into(),
            ver: 3,
            title: "draft".into(),
            pinned: true,
            tags: vec!["a".into()],
        };

        let body = encode(&note).unwrap();
        let first: Note = decode(&body).unwrap();
        let second: Note = decode(&body).unwrap();
        assert_eq!(first, note);
        assert_eq!(second, note);
    }

    #[test]
    fn decode_rejects_malformed_document() {
        let result: RepositoryResult<Note> = decode("{not json");
        assert!(result.is_err());
    }

    #[test]
    fn decode_rejects_incompatible_document() {
        let result: RepositoryResult<Note> = decode(r#"{"id":"x","ver":"three"}"#);
        assert!(result.is_err());
    }

    proptest! {
        #[test]
        fn roundtrip_preserves_all_fields(
            id in "[0-9A-Z]{26}",
            ver in any::<u64>(),
            title in ".*",
            pinned in any::<bool>(),
            tags in proptest::collection::vec(".*", 0..4),
        ) {
            let note = Note { id, ver, title, pinned, tags };
            let decoded: Note = decode(&encode(&note).unwrap()).unwrap();
            prop_assert_eq!(decoded, note);
        }
    }
}
