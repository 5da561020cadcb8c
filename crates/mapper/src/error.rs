//! Error types for mapping between entities and the generic tree.

// Variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::fmt;

use thiserror::Error;

use crate::path::FieldPath;

/// Errors raised while building a [`Registry`](crate::Registry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two different descriptors were registered under one type name.
    #[error("conflicting descriptors registered for type `{0}`")]
    DuplicateType(&'static str),

    /// A field refers to an entity type that was never registered.
    #[error("`{owner}.{field}` refers to unregistered entity type `{target}`")]
    UnresolvedEntity {
        owner: &'static str,
        field: &'static str,
        target: &'static str,
    },
}

/// Errors raised while decoding a generic tree into an entity.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// A field marked as required has no entry in the tree.
    #[error("missing required field `{0}`")]
    MissingRequiredField(FieldPath),

    /// A node's shape does not match the declared kind, after cardinality
    /// normalization.
    #[error("type mismatch at `{path}`: expected {expected}, found {found}")]
    TypeMismatch {
        path: FieldPath,
        expected: String,
        found: String,
    },

    /// A single-valued field's key occurs several times among its siblings.
    #[error("ambiguous cardinality at `{path}`: key `{key}` occurs {count} times")]
    AmbiguousCardinality {
        path: FieldPath,
        key: String,
        count: usize,
    },

    /// No descriptor is registered for the type being decoded.
    #[error("no type descriptor registered for `{0}`")]
    UnknownType(String),

    /// The tree carries a key that no declared field maps to.
    #[error("unknown key `{key}` at `{path}`")]
    UnknownKey { path: FieldPath, key: String },

    /// The document root does not name the expected entity.
    #[error("unexpected document root: expected `{expected}`, found {found}")]
    UnexpectedRoot { expected: String, found: String },

    /// A value was rejected by the target type's own deserialization logic.
    #[error("invalid value at `{path}`: {message}")]
    Invalid { path: FieldPath, message: String },

    #[error("{0}")]
    Custom(String),
}

impl DecodeError {
    pub(crate) fn mismatch(path: &FieldPath, expected: impl fmt::Display, found: impl fmt::Display) -> Self {
        DecodeError::TypeMismatch {
            path: path.clone(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Attaches `path` to errors that were raised without location.
    pub(crate) fn at(self, path: &FieldPath) -> Self {
        match self {
            DecodeError::Custom(message) => DecodeError::Invalid {
                path: path.clone(),
                message,
            },
            other => other,
        }
    }
}

impl serde::de::Error for DecodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DecodeError::Custom(msg.to_string())
    }
}

/// Errors raised while encoding an entity into a generic tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// No descriptor is registered for the type being encoded.
    #[error("no type descriptor registered for `{0}`")]
    UnknownType(String),

    /// The entity serialized a field its descriptor does not declare.
    #[error("`{type_name}` has no declared field `{field}`")]
    UndeclaredField {
        type_name: &'static str,
        field: String,
    },

    /// The Rust value does not fit the declared kind.
    #[error("kind mismatch at `{path}`: declared {expected}, got {found}")]
    KindMismatch {
        path: FieldPath,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0}")]
    Custom(String),
}

impl serde::ser::Error for EncodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        EncodeError::Custom(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_field_path() {
        let path = FieldPath::root().field("artist").index(0).field("name");
        let err = DecodeError::mismatch(&path, "scalar", "array");
        assert_eq!(
            err.to_string(),
            "type mismatch at `artist[0].name`: expected scalar, found array"
        );
        assert_eq!(
            DecodeError::MissingRequiredField(path).to_string(),
            "missing required field `artist[0].name`"
        );
    }

    #[test]
    fn test_custom_error_gains_path() {
        let path = FieldPath::root().field("year");
        let err = <DecodeError as serde::de::Error>::custom("invalid digit").at(&path);
        assert_eq!(
            err,
            DecodeError::Invalid {
                path,
                message: "invalid digit".to_string()
            }
        );
    }

    #[test]
    fn test_located_errors_keep_their_path() {
        let inner = FieldPath::root().field("artist").index(2);
        let err = DecodeError::MissingRequiredField(inner.clone()).at(&FieldPath::root());
        assert_eq!(err, DecodeError::MissingRequiredField(inner));
    }
}
