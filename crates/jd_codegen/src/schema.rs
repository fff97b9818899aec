use std::collections::BTreeSet;

use proc_macro2::Span;
use syn::{Expr, Ident, Type, Visibility};

use crate::error::SchemaError;

// -----------------------------------------------------------------------------
// DefaultValue

/// Value used for a constructor parameter when its property is unobserved.
#[derive(Debug, Clone)]
pub enum DefaultValue {
    /// No default; a missing value is a decode error (or `None` for nullable
    /// properties).
    Required,
    /// `Default::default()`.
    Trait,
    /// An arbitrary expression, evaluated once per decode.
    Expr(Expr),
}

impl DefaultValue {
    #[inline]
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required)
    }
}

// -----------------------------------------------------------------------------
// ConstructorParam

/// One positional parameter of a record's primary constructor.
#[derive(Debug, Clone)]
pub struct ConstructorParam {
    name: String,
    default: DefaultValue,
}

impl ConstructorParam {
    pub fn new(name: impl Into<String>, default: DefaultValue) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn default_value(&self) -> &DefaultValue {
        &self.default
    }
}

/// How the primary constructor is invoked.
#[derive(Debug, Clone, Default)]
pub enum ConstructorKind {
    /// A struct literal `Name { field: value, .. }`; parameters are fields.
    #[default]
    Fields,
    /// A positional call `path(a, b, ..)`.
    Function(syn::Path),
}

// -----------------------------------------------------------------------------
// PropertySchema

/// A declared property of a record.
#[derive(Debug, Clone)]
pub struct PropertySchema {
    ident: Ident,
    json_name: String,
    ty: Type,
    ignored: bool,
    span: Span,
}

impl PropertySchema {
    /// A property whose JSON field name equals its declared name.
    ///
    /// Keywords become raw identifiers (`type` → `r#type`).
    ///
    /// # Panics
    ///
    /// Panics if `name` is neither an identifier nor a keyword allowed as a raw
    /// identifier, e.g. `"1x"`, `"a-b"`, or `"self"`.
    pub fn new(name: &str, ty: Type) -> Self {
        let ident = syn::parse_str::<Ident>(name)
            .unwrap_or_else(|_| Ident::new_raw(name, Span::call_site()));
        Self::from_ident(ident, ty)
    }

    pub fn from_ident(ident: Ident, ty: Type) -> Self {
        let json_name = ident.to_string().trim_start_matches("r#").to_owned();
        let span = ident.span();
        Self {
            ident,
            json_name,
            ty,
            ignored: false,
            span,
        }
    }

    pub fn rename(mut self, json_name: impl Into<String>) -> Self {
        self.json_name = json_name.into();
        self
    }

    pub fn ignore(mut self) -> Self {
        self.ignored = true;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Declared name, without any raw-identifier prefix.
    pub fn name(&self) -> String {
        self.ident.to_string().trim_start_matches("r#").to_owned()
    }

    #[inline]
    pub fn ident(&self) -> &Ident {
        &self.ident
    }

    #[inline]
    pub fn json_name(&self) -> &str {
        &self.json_name
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }
}

// -----------------------------------------------------------------------------
// ClassSchema

/// Structural description of one record type.
///
/// Schemas are read-only once handed to the generator. They are produced either
/// by [`provider::schema_from_derive`](crate::provider::schema_from_derive) or
/// assembled by hand with the builder methods below.
///
/// Generated items refer to the record by its simple name, so they must be
/// placed in the record's own module. `module` is only used to qualify the
/// generated names in the manifest.
#[derive(Debug, Clone)]
pub struct ClassSchema {
    module: String,
    ident: Ident,
    vis: Visibility,
    base: Option<Type>,
    properties: Vec<PropertySchema>,
    params: Vec<ConstructorParam>,
    constructor: ConstructorKind,
    record_default: bool,
    register: bool,
}

impl ClassSchema {
    /// # Panics
    ///
    /// Panics if `name` is not a valid Rust identifier.
    pub fn new(module: impl Into<String>, name: &str) -> Self {
        Self::from_ident(module, Ident::new(name, Span::call_site()))
    }

    pub fn from_ident(module: impl Into<String>, ident: Ident) -> Self {
        Self {
            module: module.into(),
            ident,
            vis: syn::parse_quote!(pub),
            base: None,
            properties: Vec::new(),
            params: Vec::new(),
            constructor: ConstructorKind::Fields,
            record_default: false,
            register: true,
        }
    }

    /// Adds a property that is also a constructor parameter.
    pub fn with_field(mut self, property: PropertySchema, default: DefaultValue) -> Self {
        self.params.push(ConstructorParam::new(property.name(), default));
        self.properties.push(property);
        self
    }

    /// Adds a property without a matching constructor parameter.
    pub fn with_property(mut self, property: PropertySchema) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_param(mut self, param: ConstructorParam) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_constructor(mut self, kind: ConstructorKind) -> Self {
        self.constructor = kind;
        self
    }

    pub fn with_base(mut self, base: Type) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_vis(mut self, vis: Visibility) -> Self {
        self.vis = vis;
        self
    }

    /// The record implements `Default`; unobserved properties keep the value
    /// of `Default::default()`.
    pub fn with_record_default(mut self) -> Self {
        self.record_default = true;
        self
    }

    /// Opt this record out of `inventory` registration.
    pub fn without_registration(mut self) -> Self {
        self.register = false;
        self
    }

    #[inline]
    pub fn ident(&self) -> &Ident {
        &self.ident
    }

    #[inline]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[inline]
    pub fn vis(&self) -> &Visibility {
        &self.vis
    }

    #[inline]
    pub fn base(&self) -> Option<&Type> {
        self.base.as_ref()
    }

    #[inline]
    pub fn properties(&self) -> &[PropertySchema] {
        &self.properties
    }

    #[inline]
    pub fn params(&self) -> &[ConstructorParam] {
        &self.params
    }

    #[inline]
    pub fn constructor(&self) -> &ConstructorKind {
        &self.constructor
    }

    #[inline]
    pub fn record_default(&self) -> bool {
        self.record_default
    }

    #[inline]
    pub fn register(&self) -> bool {
        self.register
    }

    /// Simple name of the generated encoder type.
    pub fn encoder_name(&self) -> String {
        format!("{}_Serializer", self.ident)
    }

    /// Simple name of the generated decoder type.
    pub fn decoder_name(&self) -> String {
        format!("{}_Deserializer", self.ident)
    }

    /// Fully qualified name of a generated type, as listed in the manifest.
    pub fn qualified(&self, name: &str) -> String {
        if self.module.is_empty() {
            name.to_owned()
        } else {
            format!("{}::{name}", self.module)
        }
    }

    /// Why the record is not a flat record, if it is not.
    pub fn rejection_reason(&self) -> Option<String> {
        use quote::ToTokens;

        self.base.as_ref().map(|base| {
            format!(
                "it declares the base type `{}`",
                base.to_token_stream().to_string().replace(' ', "")
            )
        })
    }

    /// Checks the invariants the generator relies on.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let record = || self.ident.to_string();

        if self.params.is_empty() {
            return Err(SchemaError::EmptyConstructor { record: record() });
        }

        let mut json_names = BTreeSet::new();
        for property in self.properties.iter().filter(|p| !p.ignored) {
            if !json_names.insert(property.json_name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    record: record(),
                    field: property.json_name.clone(),
                });
            }
        }

        let literal = matches!(self.constructor, ConstructorKind::Fields);
        for property in &self.properties {
            let name = property.name();
            let param = self.params.iter().find(|p| p.name == name);
            match param {
                None if !property.ignored || literal => {
                    return Err(SchemaError::NotAParameter {
                        record: record(),
                        property: name,
                    });
                }
                Some(param)
                    if property.ignored && param.default.is_required() && !self.record_default =>
                {
                    return Err(SchemaError::IgnoredWithoutDefault {
                        record: record(),
                        property: name,
                    });
                }
                _ => {}
            }
        }

        // A struct literal cannot name a field that is not declared.
        for param in &self.params {
            let bound = self.properties.iter().any(|p| p.name() == param.name);
            if !bound && (literal || param.default.is_required()) {
                return Err(SchemaError::UnboundParameter {
                    record: record(),
                    param: param.name.clone(),
                });
            }
        }

        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
