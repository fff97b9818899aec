pub use jd_manifest::{MANIFEST_PATH, Manifest};

use crate::schema::ClassSchema;

/// The generated pair of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub encoder: String,
    pub decoder: String,
}

/// Accumulates the generated names of one pass.
///
/// The pass owns exactly one registry and flushes it once, after every record
/// has been processed.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the encoder/decoder pair generated for `schema`.
    pub fn record(&mut self, schema: &ClassSchema) {
        self.entries.push(RegistryEntry {
            encoder: schema.qualified(&schema.encoder_name()),
            decoder: schema.qualified(&schema.decoder_name()),
        });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Consumes the registry; `None` when nothing was generated.
    pub fn flush(self) -> Option<Manifest> {
        if self.entries.is_empty() {
            return None;
        }
        let manifest = self
            .entries
            .into_iter()
            .flat_map(|entry| [entry.encoder, entry.decoder])
            .collect();
        Some(manifest)
    }
}

// -----------------------------------------------------------------------------
// Tests
