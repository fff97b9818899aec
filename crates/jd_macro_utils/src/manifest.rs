use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use proc_macro2::Span;
use toml_edit::{Document, Item, Table};

/// The umbrella crate that re-exports every `jd_*` crate under its short name.
const UMBRELLA_NAME: &str = "jd_core";
const CRATE_PREFIX: &str = "jd_";

/// Dependency tables searched in order.
const DEPENDENCY_TABLES: [&str; 3] = ["dependencies", "dev-dependencies", "build-dependencies"];

/// A parsed `Cargo.toml` of the crate that invokes a macro or build script.
///
/// Generated code has to name the runtime crate the way the *invoking* crate
/// sees it, which may be a renamed dependency or a re-export through the
/// umbrella crate.
///
/// # Resolution rules
///
/// For a requested crate `jd_json`:
///
/// 1. A dependency whose key or `package` is `jd_json` → `::<key>`
///    (so `json = { package = "jd_json" }` resolves to `::json`).
/// 2. A dependency on the umbrella `jd_core` → `::jd_core::json`.
/// 3. Steps 1-2 are repeated for `dev-dependencies` and `build-dependencies`.
/// 4. Otherwise `::jd_json`.
///
/// # Example
///
/// ```rust
/// let path: syn::Path = jd_macro_utils::resolve_crate_path("jd_json");
/// assert!(!path.segments.is_empty());
/// ```
#[derive(Debug)]
pub struct CargoManifest {
    document: Document<Box<str>>,
    modified_time: SystemTime,
}

impl CargoManifest {
    /// Parses a manifest from its text.
    pub fn parse(text: &str) -> Result<Self, toml_edit::TomlError> {
        Ok(Self {
            document: Document::parse(Box::<str>::from(text))?,
            modified_time: SystemTime::UNIX_EPOCH,
        })
    }

    fn manifest_path() -> Option<PathBuf> {
        let mut path = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR")?);
        path.push("Cargo.toml");
        path.exists().then_some(path)
    }

    fn read(path: &Path, modified_time: SystemTime) -> Option<Self> {
        let text = std::fs::read_to_string(path).ok()?;
        let document = Document::parse(text.into_boxed_str()).ok()?;
        Some(Self {
            document,
            modified_time,
        })
    }

    fn parse_path(path: &str) -> Option<syn::Path> {
        syn::parse_str(path).ok()
    }

    fn fallback(name: &str) -> syn::Path {
        Self::parse_path(&format!("::{name}"))
            .unwrap_or_else(|| syn::Path::from(syn::Ident::new(name, Span::call_site())))
    }

    /// Key under which `name` is depended upon in `deps`, following renames.
    fn dependency_key<'a>(deps: &'a Table, name: &str) -> Option<&'a str> {
        deps.iter().find_map(|(key, item)| {
            let package = item
                .as_table_like()
                .and_then(|t| t.get("package"))
                .and_then(Item::as_str);
            match package {
                Some(package) if package == name => Some(key),
                None if key == name => Some(key),
                _ => None,
            }
        })
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if let Some(key) = Self::dependency_key(deps, name) {
            return Self::parse_path(&format!("::{}", key.replace('-', "_")));
        }

        let short = name.strip_prefix(CRATE_PREFIX)?;
        let umbrella = Self::dependency_key(deps, UMBRELLA_NAME)?;
        Self::parse_path(&format!("::{}::{short}", umbrella.replace('-', "_")))
    }

    /// Returns the path under which `name` is reachable from this manifest's crate.
    ///
    /// See the type-level documentation for the resolution order.
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        DEPENDENCY_TABLES
            .iter()
            .filter_map(|table| match self.document.get(table) {
                Some(Item::Table(deps)) => Some(deps),
                _ => None,
            })
            .find_map(|deps| Self::find_in_deps(deps, name))
            .unwrap_or_else(|| Self::fallback(name))
    }

    /// Runs `func` against the cached manifest of the crate being compiled.
    ///
    /// Returns `None` when `CARGO_MANIFEST_DIR` is unset or the manifest cannot
    /// be read. The parsed manifest is cached per path and invalidated when the
    /// file's modification time changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> Option<R> {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, CargoManifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path()?;
        let modified_time = std::fs::metadata(&path).and_then(|m| m.modified()).ok()?;

        let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(manifest) = manifests.get(&path)
            && manifest.modified_time == modified_time
        {
            return Some(func(manifest));
        }
        drop(manifests);

        let manifest = Self::read(&path, modified_time)?;
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);

        Some(result)
    }
}

/// Resolves `name` against the invoking crate's manifest, falling back to
/// `::name` outside of cargo.
pub fn resolve_crate_path(name: &str) -> syn::Path {
    CargoManifest::shared(|manifest| manifest.get_crate_path(name))
        .unwrap_or_else(|| CargoManifest::fallback(name))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::CargoManifest;

    #[test]
    fn direct_dependency() {
        let manifest = CargoManifest::parse(
            r#"
            [dependencies]
            jd_json = { path = "../jd_json" }
            "#,
        )
        .unwrap();
        let expected: syn::Path = parse_quote!(::jd_json);
        assert_eq!(manifest.get_crate_path("jd_json"), expected);
    }

    #[test]
    fn renamed_dependency() {
        let manifest = CargoManifest::parse(
            r#"
            [dependencies]
            json-codecs = { package = "jd_json", version = "0.0.1" }
            "#,
        )
        .unwrap();
        let expected: syn::Path = parse_quote!(::json_codecs);
        assert_eq!(manifest.get_crate_path("jd_json"), expected);
    }

    #[test]
    fn through_umbrella() {
        let manifest = CargoManifest::parse(
            r#"
            [dev-dependencies]
            jd_core = "0.0.1"
            "#,
        )
        .unwrap();
        let expected: syn::Path = parse_quote!(::jd_core::json);
        assert_eq!(manifest.get_crate_path("jd_json"), expected);
    }

    #[test]
    fn unknown_falls_back() {
        let manifest = CargoManifest::parse("[package]\nname = \"x\"\n").unwrap();
        let expected: syn::Path = parse_quote!(::jd_json);
        assert_eq!(manifest.get_crate_path("jd_json"), expected);
    }
}
