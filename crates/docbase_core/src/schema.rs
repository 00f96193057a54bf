//! Schema descriptor for record types.

use crate::entity::Entity;
use crate::error::{RepositoryError, RepositoryResult};
use serde_json::Value;

/// A validated descriptor of a record type's designated fields.
///
/// Built once at repository construction and reused for every operation.
/// The probe serializes a `Default` instance of the record type and checks
/// that the designated identifier and version fields actually appear in the
/// document with compatible kinds; a record whose serde attributes disagree
/// with its declared field names fails here instead of corrupting saves
/// later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    id_field: &'static str,
    version_field: &'static str,
}

impl Schema {
    /// Probes the record type and builds its descriptor.
    ///
    /// # Errors
    ///
    /// Returns a `Schema` error if the identifier and version designations
    /// name the same field, if either field is absent from the serialized
    /// document, or if the identifier is not a string / the version is not
    /// an unsigned integer.
    pub fn of<T: Entity>() -> RepositoryResult<Self> {
        let type_name = std::any::type_name::<T>();

        if T::ID_FIELD == T::VERSION_FIELD {
            return Err(RepositoryError::schema(
                type_name,
                format!("identifier and version both designate '{}'", T::ID_FIELD),
            ));
        }

        let probe = serde_json::to_value(T::default())?;
        let doc = probe.as_object().ok_or_else(|| {
            RepositoryError::schema(type_name, "record does not serialize to a JSON object")
        })?;

        match doc.get(T::ID_FIELD) {
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(RepositoryError::schema(
                    type_name,
                    format!("identifier field '{}' is not a string", T::ID_FIELD),
                ))
            }
            None => {
                return Err(RepositoryError::schema(
                    type_name,
                    format!("identifier field '{}' missing from document", T::ID_FIELD),
                ))
            }
        }

        match doc.get(T::VERSION_FIELD) {
            Some(v) if v.is_u64() => {}
            Some(_) => {
                return Err(RepositoryError::schema(
                    type_name,
                    format!(
                        "version field '{}' is not an unsigned integer",
                        T::VERSION_FIELD
                    ),
                ))
            }
            None => {
                return Err(RepositoryError::schema(
                    type_name,
                    format!("version field '{}' missing from document", T::VERSION_FIELD),
                ))
            }
        }

        Ok(Self {
            id_field: T::ID_FIELD,
            version_field: T::VERSION_FIELD,
        })
    }

    /// Returns the on-document name of the identifier field.
    pub fn id_field(&self) -> &'static str {
        self.id_field
    }

    /// Returns the on-document name of the version field.
    pub fn version_field(&self) -> &'static str {
        self.version_field
    }
}
