//! Source format detection.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Kind of source a document was written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFormat {
    /// PDF with its header version (e.g. `"1.7"`), if readable
    Pdf { version: Option<String> },
    /// LaTeX source
    Latex,
}

impl SourceFormat {
    /// Registry name of the converter for this format.
    pub fn converter_name(&self) -> &'static str {
        match self {
            SourceFormat::Pdf { .. } => "pdf",
            SourceFormat::Latex => "tex",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Pdf { version: Some(v) } => write!(f, "PDF {}", v),
            SourceFormat::Pdf { version: None } => write!(f, "PDF"),
            SourceFormat::Latex => write!(f, "LaTeX"),
        }
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Bytes read from the start of a file when sniffing.
const SNIFF_LEN: u64 = 8 * 1024;

/// Markers that identify LaTeX source.
const LATEX_MARKERS: &[&str] = &[r"\documentclass", r"\begin{document}", r"\section"];

/// Detect the format of a file.
///
/// The PDF magic wins over everything else; a `.tex` extension or LaTeX
/// markers near the start of the file identify LaTeX.
///
/// # Example
/// ```no_run
/// use docstruct::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("paper.pdf").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<SourceFormat> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let mut header = Vec::new();
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut header)?;

    if let Ok(format) = detect_format_from_bytes(&header) {
        return Ok(format);
    }

    let has_tex_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tex"));
    if has_tex_extension {
        return Ok(SourceFormat::Latex);
    }

    Err(Error::UnknownFormat)
}

/// Detect the format of in-memory data.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<SourceFormat> {
    if data.starts_with(PDF_MAGIC) {
        let version = data
            .get(PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN)
            .map(|v| String::from_utf8_lossy(v).to_string())
            .filter(|v| is_valid_version(v));
        return Ok(SourceFormat::Pdf { version });
    }

    let text = String::from_utf8_lossy(data);
    if LATEX_MARKERS.iter().any(|m| text.contains(m)) {
        return Ok(SourceFormat::Latex);
    }

    Err(Error::UnknownFormat)
}

/// Check if a version string looks like `1.7`.
fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check if a file starts with the PDF magic.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    matches!(detect_format_from_path(path), Ok(SourceFormat::Pdf { .. }))
}
