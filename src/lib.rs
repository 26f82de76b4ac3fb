//! # docstruct
//!
//! Logical structure recovery from PDF layouts and LaTeX projects.
//!
//! Both source formats end up as the same ordered stream of typed
//! [`ContentElement`]s (title, abstract, numbered headlines, paragraphs,
//! tables and captions), ready for indexing, summarization or narration.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docstruct::{parse_latex_project, reconstruct_file, ReconstructOptions};
//!
//! fn main() -> docstruct::Result<()> {
//!     // Clean prose from a PDF, tables and page numbers removed
//!     let text = reconstruct_file("paper.pdf", &ReconstructOptions::default())?;
//!     println!("{}", text);
//!
//!     // Structured elements from a LaTeX project
//!     let doc = parse_latex_project("paper/", "main.tex")?;
//!     for element in &doc {
//!         println!("{:?}", element);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **PDF layout reconstruction**: paragraph joining, hyphen repair, noise
//!   and table-debris filtering
//! - **LaTeX structure parsing**: includes, section numbering, appendix
//!   letters, tables, captions, abstracts
//! - **Parallel processing**: Uses Rayon for multi-page documents
//! - **Speech-ready output**: sentence chunking and narration helpers

pub mod convert;
pub mod detect;
pub mod error;
pub mod latex;
pub mod model;
pub mod pdf;
pub mod render;
pub mod speech;

// Re-export commonly used types
pub use convert::{
    ConvertOptions, ConvertResult, ConverterRegistry, DocumentConverter, LatexConverter,
    OutputFormat, PdfConverter,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, SourceFormat};
pub use error::{Error, Result};
pub use latex::{parse_latex_project, parse_latex_project_with, LatexOptions};
pub use model::{BlockKind, ContentElement, Document, ElementKind, PageBlock, TableRegion};
pub use pdf::{
    reconstruct, reconstruct_file, LopdfProvider, PageBlockProvider, PageSelection,
    ParagraphConfig, ReconstructOptions,
};
pub use render::{to_json, JsonFormat};
pub use speech::{chunk_text, speech_chunks, to_speech_text, ChunkOptions, SpeechSynthesizer};

use std::path::Path;

/// Recover the element stream of a PDF or LaTeX file.
///
/// The converter is chosen by extension, falling back to content sniffing.
/// Fails with [`Error::EmptyContent`] when nothing was recovered.
///
/// # Example
///
/// ```no_run
/// let doc = docstruct::load("paper/main.tex")?;
/// println!("{} elements", doc.len());
/// # Ok::<(), docstruct::Error>(())
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Document> {
    ConverterRegistry::with_defaults().load(path.as_ref(), &ConvertOptions::default())
}

/// Speech-ready chunks of a PDF or LaTeX file.
///
/// # Example
///
/// ```no_run
/// for chunk in docstruct::load_speech_chunks("paper.pdf", 500)? {
///     println!("{}", chunk);
/// }
/// # Ok::<(), docstruct::Error>(())
/// ```
pub fn load_speech_chunks<P: AsRef<Path>>(path: P, max_chars: usize) -> Result<Vec<String>> {
    let doc = load(path)?;
    speech_chunks(&doc, &ChunkOptions::new().with_max_chars(max_chars))
}
