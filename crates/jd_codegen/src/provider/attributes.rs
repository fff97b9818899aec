use proc_macro2::Span;
use syn::parse::ParseStream;
use syn::{Attribute, Expr, Ident, LitBool, LitStr, Path, Token, Type};

use crate::schema::DefaultValue;

const ATTRIBUTE_NAME: &str = "json";

fn duplicate(ident: &Ident) -> syn::Error {
    syn::Error::new(ident.span(), format!("duplicate `{ident}` attribute"))
}

/// Calls `parse_one` for every comma separated item of every `#[json(..)]`.
fn parse_json_attrs(
    attrs: &[Attribute],
    mut parse_one: impl FnMut(Ident, ParseStream) -> syn::Result<()>,
) -> syn::Result<()> {
    for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTRIBUTE_NAME)) {
        attr.parse_args_with(|input: ParseStream| {
            while !input.is_empty() {
                let key: Ident = input.parse()?;
                parse_one(key, input)?;
                if input.is_empty() {
                    break;
                }
                input.parse::<Token![,]>()?;
            }
            Ok(())
        })?;
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// TypeAttributes

/// Type level `#[json(..)]` options.
///
/// - `default`: the record implements `Default`.
/// - `constructor = path`: build through `path(field, ..)` in declaration
///   order instead of a struct literal.
/// - `extends = Type`: declares a base type; such records are rejected.
/// - `auto_register = false`: no inventory entries.
#[derive(Debug)]
pub(crate) struct TypeAttributes {
    pub default: Option<Span>,
    pub constructor: Option<Path>,
    pub extends: Option<Type>,
    pub auto_register: bool,
}

impl Default for TypeAttributes {
    fn default() -> Self {
        Self {
            default: None,
            constructor: None,
            extends: None,
            auto_register: true,
        }
    }
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        parse_json_attrs(attrs, |key, input| this.parse_one(key, input))?;
        Ok(this)
    }

    fn parse_one(&mut self, key: Ident, input: ParseStream) -> syn::Result<()> {
        match key.to_string().as_str() {
            "default" => {
                if self.default.replace(key.span()).is_some() {
                    return Err(duplicate(&key));
                }
            }
            "constructor" => {
                input.parse::<Token![=]>()?;
                if self.constructor.replace(input.parse()?).is_some() {
                    return Err(duplicate(&key));
                }
            }
            "extends" => {
                input.parse::<Token![=]>()?;
                if self.extends.replace(input.parse()?).is_some() {
                    return Err(duplicate(&key));
                }
            }
            "auto_register" => {
                input.parse::<Token![=]>()?;
                self.auto_register = input.parse::<LitBool>()?.value;
            }
            _ => {
                return Err(syn::Error::new(
                    key.span(),
                    format!(
                        "unknown attribute `{key}`, expected one of \
                         `default`, `constructor`, `extends`, `auto_register`"
                    ),
                ));
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// Field level `#[json(..)]` options.
///
/// - `rename = "name"`: JSON field name.
/// - `skip`: neither written nor read; filled from its default.
/// - `default` / `default = expr`: value used when the field is absent.
#[derive(Debug, Default)]
pub(crate) struct FieldAttributes {
    pub rename: Option<LitStr>,
    pub skip: Option<Span>,
    pub default: Option<DefaultValue>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        parse_json_attrs(attrs, |key, input| this.parse_one(key, input))?;
        this.validity()?;
        Ok(this)
    }

    fn parse_one(&mut self, key: Ident, input: ParseStream) -> syn::Result<()> {
        match key.to_string().as_str() {
            "rename" => {
                input.parse::<Token![=]>()?;
                if self.rename.replace(input.parse()?).is_some() {
                    return Err(duplicate(&key));
                }
            }
            "skip" => {
                if self.skip.replace(key.span()).is_some() {
                    return Err(duplicate(&key));
                }
            }
            "default" => {
                let default = if input.peek(Token![=]) {
                    input.parse::<Token![=]>()?;
                    DefaultValue::Expr(input.parse::<Expr>()?)
                } else {
                    DefaultValue::Trait
                };
                if self.default.replace(default).is_some() {
                    return Err(duplicate(&key));
                }
            }
            _ => {
                return Err(syn::Error::new(
                    key.span(),
                    format!("unknown attribute `{key}`, expected one of `rename`, `skip`, `default`"),
                ));
            }
        }
        Ok(())
    }

    fn validity(&self) -> syn::Result<()> {
        if let (Some(span), Some(rename)) = (self.skip, &self.rename) {
            let mut error = syn::Error::new(span, "`skip` fields are not written, `rename` has no effect");
            error.combine(syn::Error::new(rename.span(), "`rename` declared here"));
            return Err(error);
        }
        Ok(())
    }
}
