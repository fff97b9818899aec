#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names this crate through the path resolved from the
// invoking crate's manifest, which inside this crate (and its doc tests) is
// `jd_json`.
extern crate self as jd_json;

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod bytes;
mod codec;
mod error;
mod module;
mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use codec::{JsonDecoder, JsonEncoder};
pub use error::{DecodeError, RegistryError};
pub use jd_manifest::{MANIFEST_PATH, Manifest};
pub use module::{CodecKind, JsonModule, ModuleLoader};
pub use registry::CodecRegistry;

pub use jd_json_derive as derive;
pub use jd_json_derive::JsonData;
