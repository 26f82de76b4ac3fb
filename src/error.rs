//! Error types for docstruct.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docstruct operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while recovering document structure.
///
/// Malformed markup is never an error: unmatched braces, unterminated
/// environments and missing included files degrade to partial output.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading source files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source document or entry file does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Page index is outside `[0, page_count)`.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// Nothing readable could be recovered from the source.
    #[error("No content: {0}")]
    EmptyContent(String),

    /// The PDF backend failed to load or decode the document.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Structural table detection failed on a page.
    #[error("Table detection error: {0}")]
    TableDetection(String),

    /// A speech synthesizer rejected a chunk.
    #[error("Speech synthesis error: {0}")]
    Synthesis(String),

    /// Error while rendering the element stream.
    #[error("Rendering error: {0}")]
    Render(String),

    /// The source format could not be identified.
    #[error("Unknown source format: expected a PDF or a LaTeX file")]
    UnknownFormat,

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PageOutOfRange(99, 1);
        assert_eq!(
            err.to_string(),
            "Page 99 is out of range (document has 1 pages)"
        );

        let err = Error::NotFound(PathBuf::from("missing.pdf"));
        assert_eq!(err.to_string(), "File not found: missing.pdf");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
