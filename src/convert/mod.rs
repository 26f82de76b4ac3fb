//! Document converter module providing a plugin architecture for source formats.
//!
//! A converter turns one source file into a [`Document`] and the registry
//! dispatches on file extension, falling back to content sniffing.
//!
//! # Example
//!
//! ```no_run
//! use docstruct::convert::{ConverterRegistry, ConvertOptions, OutputFormat};
//! use std::path::Path;
//!
//! fn main() -> docstruct::Result<()> {
//!     let registry = ConverterRegistry::with_defaults();
//!     let options = ConvertOptions::new().with_format(OutputFormat::Json);
//!
//!     let result = registry.convert(Path::new("paper/main.tex"), &options)?;
//!     println!("{}", result.content);
//!     Ok(())
//! }
//! ```

mod latex;
mod pdf;

pub use latex::LatexConverter;
pub use pdf::PdfConverter;

use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};
use crate::latex::LatexOptions;
use crate::model::Document;
use crate::pdf::ReconstructOptions;
use crate::render::{to_json, to_markdown, to_text, DocumentStats, JsonFormat};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Options for document conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// PDF reconstruction options
    pub reconstruct: ReconstructOptions,

    /// LaTeX parsing options (the entry file is taken from the path)
    pub latex: LatexOptions,

    /// Whether to collect statistics during conversion
    pub collect_stats: bool,

    /// Output format
    pub output_format: OutputFormat,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set PDF reconstruction options.
    pub fn with_reconstruct_options(mut self, options: ReconstructOptions) -> Self {
        self.reconstruct = options;
        self
    }

    /// Set LaTeX parsing options.
    pub fn with_latex_options(mut self, options: LatexOptions) -> Self {
        self.latex = options;
        self
    }

    /// Enable statistics collection.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}

/// Output format for conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text, one element per paragraph
    #[default]
    Text,

    /// JSON element stream
    Json,

    /// Markdown
    Markdown,
}

impl OutputFormat {
    /// MIME type of rendered output.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text/plain",
            OutputFormat::Json => "application/json",
            OutputFormat::Markdown => "text/markdown",
        }
    }
}

/// Result of document conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Rendered content
    pub content: String,

    /// The recovered element stream
    pub document: Document,

    /// Element statistics (if collected)
    pub stats: Option<DocumentStats>,

    /// MIME type of the output
    pub mime_type: &'static str,
}

impl ConvertResult {
    /// Render a document according to the options.
    pub fn render(document: Document, options: &ConvertOptions) -> Result<Self> {
        let content = match options.output_format {
            OutputFormat::Text => to_text(&document),
            OutputFormat::Json => to_json(&document, JsonFormat::Pretty)?,
            OutputFormat::Markdown => to_markdown(&document),
        };
        let stats = options
            .collect_stats
            .then(|| DocumentStats::from_document(&document));

        Ok(Self {
            content,
            document,
            stats,
            mime_type: options.output_format.mime_type(),
        })
    }

    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Trait for document converters.
///
/// Implement this trait to add support for a new source format.
pub trait DocumentConverter: Send + Sync {
    /// Get the supported file extensions for this converter.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["pdf"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Recover the element stream of a file.
    ///
    /// Fails with [`Error::EmptyContent`] when nothing was recovered.
    fn load(&self, path: &Path, options: &ConvertOptions) -> Result<Document>;

    /// Recover and render a file.
    fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let document = self.load(path, options)?;
        ConvertResult::render(document, options)
    }

    /// Check if this converter supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Reject documents without elements.
pub(crate) fn ensure_not_empty(document: Document, path: &Path) -> Result<Document> {
    if document.is_empty() {
        return Err(Error::EmptyContent(format!(
            "no content recovered from {}",
            path.display()
        )));
    }
    Ok(document)
}

/// Registry for document converters.
///
/// The registry maps file extensions to converters and provides
/// convenient methods for converting documents.
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn DocumentConverter>>,
    by_name: HashMap<String, Arc<dyn DocumentConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the PDF and LaTeX converters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfConverter::new()));
        registry.register(Arc::new(LatexConverter::new()));
        registry
    }

    /// Register a converter.
    ///
    /// The converter will be registered for all its supported extensions.
    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        for ext in converter.supported_extensions() {
            self.converters
                .insert(ext.to_lowercase(), converter.clone());
        }
        self.by_name
            .insert(converter.name().to_lowercase(), converter);
    }

    /// Get a converter by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.converters.get(&ext.to_lowercase()).cloned()
    }

    /// Get a converter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.converters.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.converters.keys().map(|s| s.as_str()).collect()
    }

    /// Find the converter for a file.
    ///
    /// The extension decides when it is registered; otherwise the file
    /// content is sniffed.
    pub fn converter_for(&self, path: &Path) -> Result<Arc<dyn DocumentConverter>> {
        if let Some(converter) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.get_by_extension(ext))
        {
            return Ok(converter);
        }

        let format = detect_format_from_path(path)?;
        log::debug!("Detected {} for {}", format, path.display());
        self.get_by_name(format.converter_name())
            .ok_or(Error::UnknownFormat)
    }

    /// Recover the element stream of a file using the appropriate converter.
    pub fn load(&self, path: &Path, options: &ConvertOptions) -> Result<Document> {
        self.converter_for(path)?.load(path, options)
    }

    /// Convert a file using the appropriate converter.
    pub fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        self.converter_for(path)?.convert(path, options)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContentElement;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_stats(true)
            .with_format(OutputFormat::Json)
            .with_latex_options(LatexOptions::new().with_default_extension("ltx"));

        assert!(options.collect_stats);
        assert_eq!(options.output_format, OutputFormat::Json);
        assert_eq!(options.latex.default_extension, "ltx");
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = ConverterRegistry::with_defaults();
        assert!(registry.supports("pdf"));
        assert!(registry.supports("PDF"));
        assert!(registry.supports("tex"));
        assert!(!registry.supports("docx"));
        assert_eq!(registry.get_by_extension("tex").unwrap().name(), "tex");
        assert!(registry.get_by_name("pdf").is_some());
    }

    #[test]
    fn test_render_formats() {
        let doc = Document::from_elements(vec![ContentElement::headline("1.", "Intro")]);

        let text = ConvertResult::render(doc.clone(), &ConvertOptions::new()).unwrap();
        assert_eq!(text.content, "1. Intro");
        assert_eq!(text.mime_type, "text/plain");
        assert!(text.stats.is_none());

        let options = ConvertOptions::new()
            .with_format(OutputFormat::Json)
            .with_stats(true);
        let json = ConvertResult::render(doc, &options).unwrap();
        assert!(json.content.contains("\"headline\""));
        assert_eq!(json.stats.unwrap().headline_count, 1);
    }

    #[test]
    fn test_registry_sniffs_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("paper.ltx");
        fs::write(
            &path,
            "\\documentclass{article}\n\\begin{document}\n\\section{Only}\n\\end{document}",
        )
        .unwrap();

        let doc = ConverterRegistry::with_defaults()
            .load(&path, &ConvertOptions::default())
            .unwrap();
        assert_eq!(doc.elements, vec![ContentElement::headline("1.", "Only")]);

        let other = dir.path().join("notes.txt");
        fs::write(&other, "plain notes").unwrap();
        assert!(matches!(
            ConverterRegistry::with_defaults().load(&other, &ConvertOptions::default()),
            Err(Error::UnknownFormat)
        ));
    }
}
