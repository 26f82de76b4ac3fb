//! PDF converter implementation.

use crate::error::Result;
use crate::model::{ContentElement, Document};
use crate::pdf::{reconstruct, reconstruct_file, LopdfProvider};
use std::path::Path;

use super::{ensure_not_empty, ConvertOptions, ConvertResult, DocumentConverter};

/// PDF converter.
///
/// Reconstructed prose becomes one paragraph element per blank-line
/// separated block.
#[derive(Debug, Clone, Default)]
pub struct PdfConverter {
    _private: (),
}

impl PdfConverter {
    /// Create a new PDF converter.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Convert a PDF held in memory.
    pub fn convert_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<ConvertResult> {
        let provider = LopdfProvider::from_bytes(bytes)?;
        let text = reconstruct(&provider, &options.reconstruct)?;
        let document = ensure_not_empty(paragraphs(&text), Path::new("<memory>"))?;
        ConvertResult::render(document, options)
    }
}

/// Split reconstructed text into paragraph elements.
pub fn paragraphs(text: &str) -> Document {
    let elements = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(ContentElement::paragraph)
        .collect();
    Document::from_elements(elements)
}

impl DocumentConverter for PdfConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn load(&self, path: &Path, options: &ConvertOptions) -> Result<Document> {
        let text = reconstruct_file(path, &options.reconstruct)?;
        ensure_not_empty(paragraphs(&text), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_pdf_converter_extensions() {
        let converter = PdfConverter::new();
        assert_eq!(converter.supported_extensions(), &["pdf"]);
        assert!(converter.supports_extension("PDF"));
        assert!(!converter.supports_extension("tex"));
        assert_eq!(converter.name(), "pdf");
    }

    #[test]
    fn test_paragraphs() {
        let doc = paragraphs("First paragraph.\n\n  \n\nSecond one.");
        assert_eq!(
            doc.elements,
            vec![
                ContentElement::paragraph("First paragraph."),
                ContentElement::paragraph("Second one."),
            ]
        );
        assert!(paragraphs("").is_empty());
    }

    #[test]
    fn test_missing_pdf() {
        let err = PdfConverter::new()
            .load(Path::new("missing.pdf"), &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_invalid_bytes() {
        let err = PdfConverter::new()
            .convert_bytes(b"not a pdf", &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::PdfParse(_) | Error::Io(_)));
    }
}
