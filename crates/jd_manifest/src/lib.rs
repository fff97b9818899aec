//! Service manifest shared by the `jd` code generator and runtime.
#![no_std]

extern crate alloc;

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

/// Resource path of the service manifest, relative to the output directory.
pub const MANIFEST_PATH: &str = "META-INF/services/jd_json.ModuleLoader";

/// Fully qualified names of generated codecs, one per line.
///
/// Written by `jd_codegen` after a generation pass and read back by the
/// `jd_json` codec registry. Blank lines and `#` comments are ignored when
/// parsing.
///
/// ```
/// use jd_manifest::Manifest;
///
/// let manifest = Manifest::parse("# codecs\napp::Sample_Serializer\n\napp::Sample_Deserializer\n");
/// assert_eq!(manifest.len(), 2);
/// assert!(manifest.contains("app::Sample_Deserializer"));
/// assert_eq!(manifest.to_string(), "app::Sample_Serializer\napp::Sample_Deserializer\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<String>,
}

impl Manifest {
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .map(|line| line.split('#').next().unwrap_or_default().trim())
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        Self { entries }
    }

    #[inline]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry == name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for Manifest {
    type Err = core::convert::Infallible;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl<S: Into<String>> FromIterator<S> for Manifest {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.entries.iter().try_for_each(|entry| writeln!(f, "{entry}"))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::Manifest;

    #[test]
    fn comments_and_blank_lines() {
        let manifest = Manifest::parse("  a::X_Serializer  # encoder\n#\n\n\tb::Y_Deserializer\n");
        assert_eq!(manifest.entries(), ["a::X_Serializer", "b::Y_Deserializer"]);
    }

    #[test]
    fn rendered_text_parses_back() {
        let manifest: Manifest = ["m::A_Serializer", "m::A_Deserializer"].into_iter().collect();
        let text = manifest.to_string();
        assert_eq!(text, "m::A_Serializer\nm::A_Deserializer\n");
        assert_eq!(text.parse::<Manifest>(), Ok(manifest));
        assert!(Manifest::parse("").is_empty());
    }
}
