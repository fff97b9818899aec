//! Compile-time derivation of JSON encoder/decoder pairs for flat record types.
//!
//! The generator consumes a finished [`ClassSchema`] and produces Rust items:
//!
//! - `<Name>_Serializer`: writes the record as one JSON object, one field per
//!   non-ignored property, in declaration order.
//! - `<Name>_Deserializer`: reads a JSON object key by key, skips unknown
//!   fields, and builds the record either directly (every property observed) or
//!   through the declared defaults of the missing ones.
//!
//! Two entry points exist:
//!
//! - [`expand`] generates the items of one record in place; this is what
//!   `#[derive(JsonData)]` calls.
//! - [`generate`] runs a whole [`GenerationPass`] over many schemas, producing
//!   one source file per codec and the [`Manifest`] listing all of them. It is
//!   meant for build scripts.
//!
//! ```
//! use jd_codegen::{ClassSchema, CodegenOptions, DefaultValue, PropertySchema};
//! use syn::parse_quote;
//!
//! let schema = ClassSchema::new("app::model", "Sample")
//!     .with_field(PropertySchema::new("count", parse_quote!(i32)), DefaultValue::Expr(parse_quote!(0)))
//!     .with_field(PropertySchema::new("label", parse_quote!(Option<String>)), DefaultValue::Required);
//!
//! let output = jd_codegen::generate(&[schema], &CodegenOptions::default()).unwrap();
//! assert_eq!(output.files().len(), 2);
//! assert_eq!(
//!     output.manifest().unwrap().to_string(),
//!     "app::model::Sample_Serializer\napp::model::Sample_Deserializer\n",
//! );
//! ```
#![allow(clippy::std_instead_of_core, reason = "code generation crate")]
#![allow(clippy::std_instead_of_alloc, reason = "code generation crate")]

// -----------------------------------------------------------------------------
// Modules

mod decoder;
mod encoder;
mod error;
mod loader;
mod pass;
mod path;
mod registry;
mod reified;
mod schema;
mod shape;
mod unit;

pub mod provider;

// -----------------------------------------------------------------------------
// Exports

pub use error::{GenerateError, SchemaError, ShapeError};
pub use loader::CodecKind;
pub use pass::{BuildReport, GeneratedFile, GenerationOutput, GenerationPass, Rejection, generate};
pub use registry::{MANIFEST_PATH, Manifest, Registry, RegistryEntry};
pub use reified::{ReifiedCache, ReifiedType};
pub use schema::{ClassSchema, ConstructorKind, ConstructorParam, DefaultValue, PropertySchema};
pub use shape::{ScalarKind, TypeShape};
pub use unit::GenerationUnit;

use proc_macro2::TokenStream;
use quote::quote;

/// Name of the run-time crate the generated code is written against.
pub const RUNTIME_CRATE: &str = "jd_json";

/// Options shared by every record of one generation run.
#[derive(Debug, Clone)]
pub struct CodegenOptions {
    /// Path of the run-time crate as seen from the generated code.
    pub runtime_path: syn::Path,
    /// Emit an `inventory` entry for each generated codec.
    pub auto_register: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            runtime_path: syn::parse_quote!(::jd_json),
            auto_register: true,
        }
    }
}

impl CodegenOptions {
    /// Options whose runtime path is resolved from the invoking crate's
    /// `Cargo.toml`.
    pub fn resolved(auto_register: bool) -> Self {
        Self {
            runtime_path: jd_macro_utils::resolve_crate_path(RUNTIME_CRATE),
            auto_register,
        }
    }
}

/// Generates the encoder and decoder items of a single record in place.
///
/// Records declaring a base type are not flat and are refused with
/// [`GenerateError::Rejected`].
pub fn expand(schema: &ClassSchema, options: &CodegenOptions) -> Result<TokenStream, GenerateError> {
    if let Some(reason) = schema.rejection_reason() {
        return Err(GenerateError::Rejected {
            record: schema.ident().to_string(),
            reason,
        });
    }

    let unit = GenerationUnit::new(schema)?;
    let encoder = encoder::generate_encoder(&unit, options);
    let decoder = decoder::generate_decoder(&unit, options);

    Ok(quote! {
        #encoder
        #decoder
    })
}
