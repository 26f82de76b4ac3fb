//! LaTeX converter implementation.

use crate::error::{Error, Result};
use crate::latex::parse_latex_project_with;
use crate::model::Document;
use std::path::Path;

use super::{ensure_not_empty, ConvertOptions, DocumentConverter};

/// LaTeX converter.
///
/// The given file is the entry file and its directory the project root,
/// so relative `\input` directives resolve next to it.
#[derive(Debug, Clone, Default)]
pub struct LatexConverter {
    _private: (),
}

impl LatexConverter {
    /// Create a new LaTeX converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for LatexConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["tex", "latex"]
    }

    fn name(&self) -> &str {
        "tex"
    }

    fn load(&self, path: &Path, options: &ConvertOptions) -> Result<Document> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::NotFound(path.to_path_buf()))?;
        let root = path.parent().unwrap_or_else(|| Path::new(""));

        let latex = options.latex.clone().with_main_file(file_name);
        let document = parse_latex_project_with(root, &latex)?;
        ensure_not_empty(document, path)
    }
}
