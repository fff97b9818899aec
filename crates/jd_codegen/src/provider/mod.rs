//! Schema provider for `#[derive(JsonData)]`.
//!
//! Turns a struct definition into a [`ClassSchema`]. Only flat records are
//! accepted: structs with named fields, no generics and no lifetimes.

// -----------------------------------------------------------------------------
// Modules

mod attributes;

use attributes::{FieldAttributes, TypeAttributes};

// -----------------------------------------------------------------------------
// Provider

use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields};

use crate::schema::{ClassSchema, ConstructorKind, DefaultValue, PropertySchema};

fn not_flat(input: &DeriveInput, what: &str) -> syn::Error {
    syn::Error::new(
        input.ident.span(),
        format!(
            "`JsonData` supports structs with named fields only, `{}` is {what}",
            input.ident
        ),
    )
}

/// Builds the schema of a derive input.
///
/// `module` qualifies the generated names in a manifest and may be empty.
/// A record declared with `#[json(extends = Base)]` still yields a schema;
/// it is the generator that refuses it.
pub fn schema_from_derive(input: &DeriveInput, module: &str) -> syn::Result<ClassSchema> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unnamed(_) => return Err(not_flat(input, "a tuple struct")),
            Fields::Unit => return Err(not_flat(input, "a unit struct")),
        },
        Data::Enum(_) => return Err(not_flat(input, "an enum")),
        Data::Union(_) => return Err(not_flat(input, "a union")),
    };

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            format!(
                "`JsonData` does not support generic parameters or lifetimes on `{}`",
                input.ident
            ),
        ));
    }

    let attrs = TypeAttributes::parse_attrs(&input.attrs)?;

    let mut schema = ClassSchema::from_ident(module, input.ident.clone()).with_vis(input.vis.clone());

    for field in fields {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let field_attrs = FieldAttributes::parse_attrs(&field.attrs)?;

        let mut property = PropertySchema::from_ident(ident, field.ty.clone()).with_span(field.ty.span());
        if let Some(rename) = &field_attrs.rename {
            property = property.rename(rename.value());
        }
        let default = match field_attrs.default {
            Some(default) => default,
            // Skipped fields of a `#[json(default)]` record keep the value of
            // the record's own `Default`.
            None if field_attrs.skip.is_some() && attrs.default.is_none() => DefaultValue::Trait,
            None => DefaultValue::Required,
        };
        if field_attrs.skip.is_some() {
            property = property.ignore();
        }

        schema = schema.with_field(property, default);
    }

    if let Some(constructor) = attrs.constructor {
        schema = schema.with_constructor(ConstructorKind::Function(constructor));
    }
    if let Some(base) = attrs.extends {
        schema = schema.with_base(base);
    }
    if attrs.default.is_some() {
        schema = schema.with_record_default();
    }
    if !attrs.auto_register {
        schema = schema.without_registration();
    }

    Ok(schema)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use syn::{DeriveInput, parse_quote};

    use super::schema_from_derive;
    use crate::schema::{ConstructorKind, DefaultValue};

    #[test]
    fn fields_and_attributes() {
        let input: DeriveInput = parse_quote! {
            #[derive(JsonData)]
            #[json(auto_register = false)]
            pub struct Sample {
                #[json(default = 0)]
                count: i32,
                #[json(rename = "name")]
                label: Option<String>,
                #[json(default)]
                tags: Vec<String>,
                #[json(skip)]
                cache: u64,
            }
        };
        let schema = schema_from_derive(&input, "app").unwrap();

        assert_eq!(schema.ident(), "Sample");
        assert!(!schema.register());
        assert!(schema.validate().is_ok());

        let names: Vec<_> = schema.properties().iter().map(|p| p.json_name()).collect();
        assert_eq!(names, ["count", "name", "tags", "cache"]);
        assert!(schema.properties()[3].is_ignored());

        let params = schema.params();
        assert!(matches!(params[0].default_value(), DefaultValue::Expr(_)));
        assert!(params[1].default_value().is_required());
        assert!(matches!(params[2].default_value(), DefaultValue::Trait));
        assert!(matches!(params[3].default_value(), DefaultValue::Trait));
    }

    #[test]
    fn constructor_and_record_default() {
        let input: DeriveInput = parse_quote! {
            #[json(default, constructor = Point::new)]
            struct Point {
                x: f64,
                y: f64,
            }
        };
        let schema = schema_from_derive(&input, "").unwrap();
        assert!(schema.record_default());
        assert!(matches!(schema.constructor(), ConstructorKind::Function(_)));
    }

    #[test]
    fn skipped_field_of_default_record() {
        let input: DeriveInput = parse_quote! {
            #[json(default)]
            struct Settings {
                width: u32,
                #[json(skip)]
                dirty: bool,
            }
        };
        let schema = schema_from_derive(&input, "").unwrap();
        assert!(schema.params()[1].default_value().is_required());
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn base_type_is_kept_for_rejection() {
        let input: DeriveInput = parse_quote! {
            #[json(extends = Base)]
            struct Derived {
                id: u32,
            }
        };
        let schema = schema_from_derive(&input, "").unwrap();
        assert!(schema.rejection_reason().is_some());
    }

    #[test]
    fn rejects_non_flat_types() {
        let inputs: [DeriveInput; 4] = [
            parse_quote!(enum Shape { Circle, Square }),
            parse_quote!(struct Pair(i32, i32);),
            parse_quote!(struct Marker;),
            parse_quote!(struct Wrapper<T> { inner: T }),
        ];
        for input in inputs {
            assert!(schema_from_derive(&input, "").is_err());
        }
    }

    #[test]
    fn attribute_errors() {
        let unknown: DeriveInput = parse_quote! {
            struct Sample {
                #[json(flatten)]
                inner: Inner,
            }
        };
        let message = schema_from_derive(&unknown, "").unwrap_err().to_string();
        assert!(message.contains("unknown attribute `flatten`"));

        let conflicting: DeriveInput = parse_quote! {
            struct Sample {
                #[json(skip, rename = "x")]
                inner: Inner,
            }
        };
        assert!(schema_from_derive(&conflicting, "").is_err());
    }
}
