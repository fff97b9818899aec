use alloc::string::String;

use thiserror::Error;

use crate::CodecKind;

/// A JSON object that cannot be turned into a record.
///
/// Raised by generated decoders through `serde::de::Error::custom`, so it
/// reaches callers as the deserializer's own error type.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("cannot construct `{record}`: missing field `{field}` has no default")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },
}

/// Failure of a [`CodecRegistry`](crate::CodecRegistry) operation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("no {kind} registered for `{type_name}`")]
    NotRegistered { kind: CodecKind, type_name: String },

    #[error("`{0}` is listed in the manifest but was never registered")]
    MissingLoader(String),

    #[error("decoded a `{found}` where a `{expected}` was expected")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
