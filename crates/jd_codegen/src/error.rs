use std::path::PathBuf;

use proc_macro2::Span;
use thiserror::Error;

// -----------------------------------------------------------------------------
// ShapeError

/// A declared type that cannot be turned into a [`TypeShape`](crate::TypeShape).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShapeError {
    #[error("`{ty}` expects {expected} type argument(s), found {found}")]
    Arity {
        ty: String,
        expected: usize,
        found: usize,
    },

    #[error("`{ty}` has a generic argument that is not a type")]
    NonTypeArgument { ty: String },

    #[error("`{ty}` wraps a nullable type in another nullable type")]
    NestedNullable { ty: String },

    #[error("`{ty}` cannot be decoded into an owned value")]
    Unsupported { ty: String },
}

// -----------------------------------------------------------------------------
// SchemaError

/// A [`ClassSchema`](crate::ClassSchema) that breaks one of its invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("record `{record}` has no constructor parameters")]
    EmptyConstructor { record: String },

    #[error("record `{record}` uses the JSON field name `{field}` more than once")]
    DuplicateField { record: String, field: String },

    #[error("record `{record}`: property `{property}` is not a constructor parameter")]
    NotAParameter { record: String, property: String },

    #[error("record `{record}`: constructor parameter `{param}` is bound to no property and cannot be defaulted")]
    UnboundParameter { record: String, param: String },

    #[error("record `{record}`: ignored property `{property}` has no default")]
    IgnoredWithoutDefault { record: String, property: String },
}

// -----------------------------------------------------------------------------
// GenerateError

/// Failure of a generation run.
///
/// Any error aborts the whole pass: a malformed codec is worse than none.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerateError {
    #[error("record `{record}`, property `{property}`: {source}")]
    Shape {
        record: String,
        property: String,
        span: Span,
        #[source]
        source: ShapeError,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("record `{record}` is not a flat record: {reason}")]
    Rejected { record: String, reason: String },

    #[error("failed to write `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    /// Converts the error into a `syn::Error`, pointing at the offending
    /// property when one is known.
    pub fn to_syn_error(&self) -> syn::Error {
        let span = match self {
            Self::Shape { span, .. } => *span,
            _ => Span::call_site(),
        };
        syn::Error::new(span, self)
    }
}
