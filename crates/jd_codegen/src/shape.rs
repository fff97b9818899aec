use quote::ToTokens;
use syn::{GenericArgument, PathArguments, PathSegment, Type, TypePath};

use crate::error::ShapeError;

/// Primitive JSON scalars, one per writer primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Char,
    Int,
    UInt,
    Float,
    NonZero,
    /// `serde_json::Number`, arbitrary precision.
    Number,
}

/// Structural category of a declared property type.
///
/// Every leaf keeps the declared type it was classified from, so later stages
/// can render it without going back to the schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeShape {
    Scalar(ScalarKind, Type),
    Text(Type),
    ByteSequence(Type),
    /// Another record (or any type with its own codec), never inlined.
    NestedRecord(Type),
    Sequence {
        container: syn::Path,
        element: Box<TypeShape>,
    },
    Map {
        container: syn::Path,
        key: Box<TypeShape>,
        value: Box<TypeShape>,
    },
    Nullable(Box<TypeShape>),
}

const SEQUENCES: &[&str] = &[
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashSet",
    "BTreeSet",
    "BinaryHeap",
    "IndexSet",
];

const MAPS: &[&str] = &["HashMap", "BTreeMap", "IndexMap"];

fn render(ty: &impl ToTokens) -> String {
    ty.to_token_stream().to_string().replace(' ', "")
}

fn scalar_kind(ident: &str) -> Option<ScalarKind> {
    Some(match ident {
        "bool" => ScalarKind::Bool,
        "char" => ScalarKind::Char,
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" => ScalarKind::Int,
        "u8" | "u16" | "u32" | "u64" | "u128" | "usize" => ScalarKind::UInt,
        "f32" | "f64" => ScalarKind::Float,
        "NonZeroI8" | "NonZeroI16" | "NonZeroI32" | "NonZeroI64" | "NonZeroI128"
        | "NonZeroIsize" | "NonZeroU8" | "NonZeroU16" | "NonZeroU32" | "NonZeroU64"
        | "NonZeroU128" | "NonZeroUsize" | "NonZero" => ScalarKind::NonZero,
        _ => return None,
    })
}

/// Type arguments of a path segment; lifetimes are skipped.
fn type_arguments<'a>(segment: &'a PathSegment, ty: &Type) -> Result<Vec<&'a Type>, ShapeError> {
    match &segment.arguments {
        PathArguments::None => Ok(Vec::new()),
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter(|arg| !matches!(arg, GenericArgument::Lifetime(_)))
            .map(|arg| match arg {
                GenericArgument::Type(ty) => Ok(ty),
                _ => Err(ShapeError::NonTypeArgument { ty: render(ty) }),
            })
            .collect(),
        PathArguments::Parenthesized(_) => Err(ShapeError::NonTypeArgument { ty: render(ty) }),
    }
}

fn expect_arity<'a>(
    args: Vec<&'a Type>,
    expected: usize,
    ty: &Type,
) -> Result<Vec<&'a Type>, ShapeError> {
    if args.len() == expected {
        Ok(args)
    } else {
        Err(ShapeError::Arity {
            ty: render(ty),
            expected,
            found: args.len(),
        })
    }
}

/// The declared container path with the generic arguments of its last
/// segment removed, e.g. `std::collections::HashMap`.
fn container_path(path: &syn::Path) -> syn::Path {
    let mut path = path.clone();
    if let Some(last) = path.segments.last_mut() {
        last.arguments = PathArguments::None;
    }
    path
}

fn is_ident(ty: &Type, name: &str) -> bool {
    match ty {
        Type::Path(TypePath { qself: None, path }) => path.is_ident(name),
        Type::Group(group) => is_ident(&group.elem, name),
        Type::Paren(paren) => is_ident(&paren.elem, name),
        _ => false,
    }
}

/// `[u8]`, the payload of `Box<[u8]>`.
fn is_byte_slice(ty: &Type) -> bool {
    matches!(ty, Type::Slice(slice) if is_ident(&slice.elem, "u8"))
}

impl TypeShape {
    /// Classifies a declared type.
    ///
    /// Returns exactly one shape, wrapped in [`TypeShape::Nullable`] iff the
    /// declared type is an `Option`. Anything that is not a known scalar, text,
    /// byte, sequence or map type is a [`TypeShape::NestedRecord`].
    pub fn classify(ty: &Type) -> Result<Self, ShapeError> {
        match ty {
            Type::Group(group) => Self::classify(&group.elem),
            Type::Paren(paren) => Self::classify(&paren.elem),
            Type::Path(TypePath { qself: None, path }) => Self::classify_path(path, ty),
            Type::Array(_) | Type::Tuple(_) | Type::Path(_) => Ok(Self::NestedRecord(ty.clone())),
            _ => Err(ShapeError::Unsupported { ty: render(ty) }),
        }
    }

    fn classify_path(path: &syn::Path, ty: &Type) -> Result<Self, ShapeError> {
        let Some(segment) = path.segments.last() else {
            return Ok(Self::NestedRecord(ty.clone()));
        };
        let name = segment.ident.to_string();
        let args = type_arguments(segment, ty)?;

        if name == "Option" {
            let inner = Self::classify(expect_arity(args, 1, ty)?[0])?;
            if inner.is_nullable() {
                return Err(ShapeError::NestedNullable { ty: render(ty) });
            }
            return Ok(Self::Nullable(Box::new(inner)));
        }

        if args.is_empty()
            && let Some(kind) = scalar_kind(&name)
        {
            return Ok(Self::Scalar(kind, ty.clone()));
        }
        if name == "NonZero" {
            expect_arity(args, 1, ty)?;
            return Ok(Self::Scalar(ScalarKind::NonZero, ty.clone()));
        }
        if name == "Number"
            && path.segments.len() >= 2
            && path.segments[path.segments.len() - 2].ident == "serde_json"
        {
            return Ok(Self::Scalar(ScalarKind::Number, ty.clone()));
        }

        match name.as_str() {
            "String" if args.is_empty() => return Ok(Self::Text(ty.clone())),
            "Box" if args.len() == 1 && is_ident(args[0], "str") => {
                return Ok(Self::Text(ty.clone()));
            }
            "Cow" if args.len() == 1 && is_ident(args[0], "str") => {
                return Ok(Self::Text(ty.clone()));
            }
            "Vec" if args.len() == 1 && is_ident(args[0], "u8") => {
                return Ok(Self::ByteSequence(ty.clone()));
            }
            "Box" if args.len() == 1 && is_byte_slice(args[0]) => {
                return Ok(Self::ByteSequence(ty.clone()));
            }
            _ => {}
        }

        if SEQUENCES.contains(&name.as_str()) {
            let args = expect_arity(args, 1, ty)?;
            return Ok(Self::Sequence {
                container: container_path(path),
                element: Box::new(Self::classify(args[0])?),
            });
        }

        if MAPS.contains(&name.as_str()) {
            let args = expect_arity(args, 2, ty)?;
            return Ok(Self::Map {
                container: container_path(path),
                key: Box::new(Self::classify(args[0])?),
                value: Box::new(Self::classify(args[1])?),
            });
        }

        Ok(Self::NestedRecord(ty.clone()))
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }

    /// The shape without its nullable wrapper.
    pub fn non_null(&self) -> &Self {
        match self {
            Self::Nullable(inner) => inner,
            shape => shape,
        }
    }

    /// Whether this shape carries generic element descriptors, so that a
    /// reified type has to be built for it.
    pub fn is_generic(&self) -> bool {
        matches!(
            self.non_null(),
            Self::Sequence { .. } | Self::Map { .. }
        )
    }
}

// -----------------------------------------------------------------------------
// Tests
