use core::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use proc_macro2::TokenStream;
use quote::ToTokens;

use crate::CodegenOptions;
use crate::decoder::generate_decoder;
use crate::encoder::generate_encoder;
use crate::error::GenerateError;
use crate::loader::CodecKind;
use crate::registry::{MANIFEST_PATH, Manifest, Registry};
use crate::schema::ClassSchema;
use crate::unit::GenerationUnit;

// -----------------------------------------------------------------------------
// GeneratedFile

/// Source of one generated codec.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    file_name: String,
    record: String,
    kind: CodecKind,
    contents: String,
}

impl GeneratedFile {
    fn new(schema: &ClassSchema, kind: CodecKind, tokens: TokenStream) -> Self {
        let name = match kind {
            CodecKind::Encoder => schema.encoder_name(),
            CodecKind::Decoder => schema.decoder_name(),
        };
        let record = schema.qualified(&schema.ident().to_string());
        let contents = format!(
            "// Generated JSON {kind} of `{record}`. Do not edit.\n\n{}",
            render(tokens)
        );
        Self {
            file_name: format!("{name}.rs"),
            record,
            kind,
            contents,
        }
    }

    /// `<Name>_Serializer.rs` or `<Name>_Deserializer.rs`.
    #[inline]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Qualified name of the record the codec belongs to.
    #[inline]
    pub fn record(&self) -> &str {
        &self.record
    }

    #[inline]
    pub fn kind(&self) -> CodecKind {
        self.kind
    }

    #[inline]
    pub fn contents(&self) -> &str {
        &self.contents
    }
}

/// One top-level item per paragraph.
fn render(tokens: TokenStream) -> String {
    match syn::parse2::<syn::File>(tokens.clone()) {
        Ok(file) => file
            .items
            .iter()
            .map(|item| format!("{}\n", item.to_token_stream()))
            .collect::<Vec<_>>()
            .join("\n"),
        Err(_) => format!("{tokens}\n"),
    }
}

// -----------------------------------------------------------------------------
// BuildReport

/// A record skipped by the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub record: String,
    pub reason: String,
}

/// Summary of one pass.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    generated: Vec<String>,
    rejected: Vec<Rejection>,
}

impl BuildReport {
    #[inline]
    pub fn generated(&self) -> &[String] {
        &self.generated
    }

    #[inline]
    pub fn rejected(&self) -> &[Rejection] {
        &self.rejected
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "generated codecs for {} record(s), rejected {}",
            self.generated.len(),
            self.rejected.len()
        )?;
        for rejection in &self.rejected {
            writeln!(f, "  `{}`: {}", rejection.record, rejection.reason)?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// GenerationPass

/// Result of a successful pass.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    files: Vec<GeneratedFile>,
    manifest: Option<Manifest>,
    report: BuildReport,
}

impl GenerationOutput {
    #[inline]
    pub fn files(&self) -> &[GeneratedFile] {
        &self.files
    }

    /// `None` when no record was processed.
    #[inline]
    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    #[inline]
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Writes every generated file into `dir`, and the manifest under its
    /// resource path. Returns the written paths.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, GenerateError> {
        let dir = dir.as_ref();
        let mut written = Vec::with_capacity(self.files.len() + 1);

        for file in &self.files {
            written.push(write_file(&dir.join(&file.file_name), &file.contents)?);
        }
        if let Some(manifest) = &self.manifest {
            written.push(write_file(&dir.join(MANIFEST_PATH), &manifest.to_string())?);
        }

        Ok(written)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<PathBuf, GenerateError> {
    let io_error = |source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, contents).map_err(io_error)?;
    log::debug!("wrote `{}`", path.display());
    Ok(path.to_path_buf())
}

/// One run of the generator over a set of schemas.
///
/// Records with a base type are skipped with a warning; any other failure
/// aborts the pass, so no partial output is ever produced.
#[derive(Debug)]
pub struct GenerationPass {
    options: CodegenOptions,
    files: Vec<GeneratedFile>,
    report: BuildReport,
}

impl GenerationPass {
    pub fn new(options: CodegenOptions) -> Self {
        Self {
            options,
            files: Vec::new(),
            report: BuildReport::default(),
        }
    }

    /// Generates both codecs of `schema` and records them in `registry`.
    ///
    /// Returns `false` if the record was rejected.
    pub fn process(
        &mut self,
        schema: &ClassSchema,
        registry: &mut Registry,
    ) -> Result<bool, GenerateError> {
        let record = schema.qualified(&schema.ident().to_string());

        if let Some(reason) = schema.rejection_reason() {
            log::warn!("skipping `{record}`: {reason}");
            self.report.rejected.push(Rejection { record, reason });
            return Ok(false);
        }

        let unit = GenerationUnit::new(schema)?;
        let encoder = generate_encoder(&unit, &self.options);
        let decoder = generate_decoder(&unit, &self.options);

        self.files.push(GeneratedFile::new(schema, CodecKind::Encoder, encoder));
        self.files.push(GeneratedFile::new(schema, CodecKind::Decoder, decoder));
        registry.record(schema);

        log::debug!("generated codecs for `{record}`");
        self.report.generated.push(record);
        Ok(true)
    }

    /// Flushes `registry` and returns everything generated.
    pub fn finish(self, registry: Registry) -> GenerationOutput {
        GenerationOutput {
            files: self.files,
            manifest: registry.flush(),
            report: self.report,
        }
    }
}

/// Runs a whole pass over `schemas`.
pub fn generate(
    schemas: &[ClassSchema],
    options: &CodegenOptions,
) -> Result<GenerationOutput, GenerateError> {
    let mut registry = Registry::new();
    let mut pass = GenerationPass::new(options.clone());
    for schema in schemas {
        pass.process(schema, &mut registry)?;
    }
    Ok(pass.finish(registry))
}
