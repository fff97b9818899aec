#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

//! Derive macro of the `jd_json` crate.
//!
//! The code generation itself lives in `jd_codegen`; this crate only wires it
//! to `proc_macro`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

use jd_codegen::{CodegenOptions, GenerateError};

/// Generates a JSON encoder/decoder pair for a flat record.
///
/// For a struct `Name` with named fields, the derive emits:
///
/// - `Name_Serializer`, implementing `JsonEncoder<Name>` and `ModuleLoader`;
/// - `Name_Deserializer`, implementing `JsonDecoder<Name>` and `ModuleLoader`;
/// - `serde::Serialize` and `serde::Deserialize` for `Name`, forwarding to the
///   two codecs, so that `Name` can be used with any serde format and nested in
///   other records;
/// - with the `auto_register` feature, an `inventory` entry per codec, picked
///   up by `CodecRegistry::auto_register`.
///
/// # Attributes
///
/// On the type:
///
/// - `#[json(default)]`: `Name: Default`, absent fields keep the value of
///   `Name::default()`.
/// - `#[json(constructor = path)]`: build the record through
///   `path(field0, field1, ..)` in declaration order.
/// - `#[json(auto_register = false)]`: no `inventory` entries.
/// - `#[json(extends = Base)]`: declares a base type. Such records are not flat
///   and are refused.
///
/// On fields:
///
/// - `#[json(rename = "name")]`: JSON field name.
/// - `#[json(default)]` / `#[json(default = expr)]`: value used when the field
///   is absent from the input.
/// - `#[json(skip)]`: never written nor read; filled from its default.
///
/// An absent field with no default is an error, except for `Option` fields,
/// which become `None`. An explicit `null` is decoded as `None` as well, but
/// counts as present.
///
/// # Example
///
/// ```rust, ignore
/// use jd_json::JsonData;
///
/// #[derive(JsonData, Debug, PartialEq)]
/// struct Sample {
///     #[json(default = 0)]
///     count: i32,
///     label: Option<String>,
///     #[json(default)]
///     tags: Vec<String>,
/// }
///
/// let sample: Sample = serde_json::from_str(r#"{"count":5,"unknown":[1,{"a":2}]}"#).unwrap();
/// assert_eq!(sample, Sample { count: 5, label: None, tags: vec![] });
///
/// let json = serde_json::to_string(&sample).unwrap();
/// assert_eq!(json, r#"{"count":5,"label":null,"tags":[]}"#);
/// ```
#[proc_macro_derive(JsonData, attributes(json))]
pub fn derive_json_data(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let schema = match jd_codegen::provider::schema_from_derive(&ast, "") {
        Ok(schema) => schema,
        Err(err) => return err.into_compile_error().into(),
    };

    let options = CodegenOptions::resolved(cfg!(feature = "auto_register"));

    match jd_codegen::expand(&schema, &options) {
        Ok(tokens) => tokens.into(),
        Err(err @ GenerateError::Rejected { .. }) => match schema.base() {
            Some(base) => syn::Error::new_spanned(base, err).into_compile_error().into(),
            None => err.to_syn_error().into_compile_error().into(),
        },
        Err(err) => err.to_syn_error().into_compile_error().into(),
    }
}
