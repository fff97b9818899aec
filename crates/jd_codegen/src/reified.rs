use indexmap::IndexMap;
use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, format_ident, quote};
use syn::{Ident, Type};

use crate::path::fp::OptionFP;
use crate::shape::TypeShape;

/// Fully specified generic type descriptor of a collection property.
///
/// Rendered as a Rust type, it tells the host JSON layer exactly which
/// element, key and value types to produce.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReifiedType {
    Class(Type),
    Nullable(Box<ReifiedType>),
    Sequence {
        container: syn::Path,
        element: Box<ReifiedType>,
    },
    Map {
        container: syn::Path,
        key: Box<ReifiedType>,
        value: Box<ReifiedType>,
    },
}

impl ReifiedType {
    /// Builds the reified type of a shape.
    ///
    /// Returns `None` for shapes that are decoded through their declared type
    /// directly: scalars, text, bytes and nested records.
    pub fn build(shape: &TypeShape) -> Option<Self> {
        shape.is_generic().then(|| Self::build_inner(shape))
    }

    fn build_inner(shape: &TypeShape) -> Self {
        match shape {
            TypeShape::Scalar(_, ty)
            | TypeShape::Text(ty)
            | TypeShape::ByteSequence(ty)
            | TypeShape::NestedRecord(ty) => Self::Class(ty.clone()),
            TypeShape::Nullable(inner) => Self::Nullable(Box::new(Self::build_inner(inner))),
            TypeShape::Sequence { container, element } => Self::Sequence {
                container: container.clone(),
                element: Box::new(Self::build_inner(element)),
            },
            TypeShape::Map {
                container,
                key,
                value,
            } => Self::Map {
                container: container.clone(),
                key: Box::new(Self::build_inner(key)),
                value: Box::new(Self::build_inner(value)),
            },
        }
    }
}

impl ToTokens for ReifiedType {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        match self {
            Self::Class(ty) => ty.to_tokens(tokens),
            Self::Nullable(inner) => quote!(#OptionFP<#inner>).to_tokens(tokens),
            Self::Sequence { container, element } => quote!(#container<#element>).to_tokens(tokens),
            Self::Map {
                container,
                key,
                value,
            } => quote!(#container<#key, #value>).to_tokens(tokens),
        }
    }
}

/// Per-decoder cache of reified types.
///
/// Each distinct type is built once and rendered once as a `type` alias; the
/// aliases are numbered in order of first use so the output is deterministic.
#[derive(Debug, Default)]
pub struct ReifiedCache {
    aliases: IndexMap<ReifiedType, Ident>,
}

impl ReifiedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alias naming `reified`, allocating one on first use.
    pub fn alias(&mut self, reified: &ReifiedType) -> Ident {
        if let Some(alias) = self.aliases.get(reified) {
            return alias.clone();
        }
        let alias = format_ident!("__Reified{}", self.aliases.len(), span = Span::call_site());
        self.aliases.insert(reified.clone(), alias.clone());
        alias
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// One `type` alias per cached reified type.
    pub fn definitions(&self) -> TokenStream {
        let items = self
            .aliases
            .iter()
            .map(|(reified, alias)| quote!(type #alias = #reified;));
        quote!(#(#items)*)
    }
}

// -----------------------------------------------------------------------------
// Tests
