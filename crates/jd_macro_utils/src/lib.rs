//! Shared helpers for the `jd` proc-macro and code generation crates.
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro crate")]
#![allow(clippy::std_instead_of_core, reason = "proc-macro crate")]

// -----------------------------------------------------------------------------
// Modules

mod manifest;

// -----------------------------------------------------------------------------
// Exports

pub use manifest::{CargoManifest, resolve_crate_path};
