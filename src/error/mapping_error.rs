//! Structural errors raised while mapping failures to public paths.

use crate::kind::Kind;

/// A failure-reporting configuration that does not match the object's shape.
///
/// Unlike a validation failure, a `MappingError` means the validation system
/// itself is out of sync with the schema. It aborts the whole mapping call;
/// no partial result is ever returned alongside it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// A value that had to be traversed is not a struct (or, for index and
    /// key segments, not a slice or map). Empty references report
    /// [`Kind::Invalid`].
    #[error("expected a struct but got a {kind}")]
    NonTraversableType { kind: Kind },

    /// The struct type has no member with this internal name.
    #[error("field '{field}' not found on type '{type_name}'")]
    FieldNotFound { field: String, type_name: String },
}

impl MappingError {
    pub fn non_traversable(kind: Kind) -> Self {
        MappingError::NonTraversableType { kind }
    }

    pub fn field_not_found(field: impl Into<String>, type_name: impl Into<String>) -> Self {
        MappingError::FieldNotFound {
            field: field.into(),
            type_name: type_name.into(),
        }
    }
}
