//! LaTeX project parsing.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{ContentElement, Document};

use super::clean::clean;
use super::preprocess::{strip_comments, IncludeExpander};
use super::scan::extract_braced;
use super::walker::{BodyWalker, SectionCounters};

static RE_DOC_BEGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\begin\s*\{document\}").expect("valid document begin regex")
});
static RE_DOC_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\end\s*\{document\}").expect("valid document end regex"));
static RE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\title\s*\{").expect("valid title regex"));

/// Options for parsing a LaTeX project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatexOptions {
    /// Entry file, relative to the project root
    pub main_file: String,

    /// Extension appended to included names that lack it
    pub default_extension: String,
}

impl LatexOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry file.
    pub fn with_main_file(mut self, main_file: impl Into<String>) -> Self {
        self.main_file = main_file.into();
        self
    }

    /// Set the extension appended to included file names.
    pub fn with_default_extension(mut self, extension: impl Into<String>) -> Self {
        self.default_extension = extension.into();
        self
    }
}

impl Default for LatexOptions {
    fn default() -> Self {
        Self {
            main_file: "main.tex".to_string(),
            default_extension: "tex".to_string(),
        }
    }
}

/// Parse the project at `root` starting from `main_file`.
///
/// # Example
///
/// ```no_run
/// let doc = docstruct::parse_latex_project("paper/", "main.tex")?;
/// for element in &doc {
///     println!("{:?}", element);
/// }
/// # Ok::<(), docstruct::Error>(())
/// ```
pub fn parse_latex_project<P: AsRef<Path>>(root: P, main_file: &str) -> Result<Document> {
    let options = LatexOptions::new().with_main_file(main_file);
    parse_latex_project_with(root, &options)
}

/// Parse a project with explicit options.
pub fn parse_latex_project_with<P: AsRef<Path>>(root: P, options: &LatexOptions) -> Result<Document> {
    let root = root.as_ref();
    let entry: PathBuf = root.join(&options.main_file);
    if !entry.is_file() {
        return Err(Error::NotFound(entry));
    }

    let bytes = fs::read(&entry)?;
    let source = String::from_utf8_lossy(&bytes);
    log::debug!("Parsing LaTeX project {}", entry.display());

    Ok(parse_latex_source(&source, root, options))
}

/// Parse LaTeX source held in memory.
///
/// Inclusion directives resolve against `base_dir`. The title, if any,
/// comes first; the body is walked for headings, environments and prose.
pub fn parse_latex_source(source: &str, base_dir: &Path, options: &LatexOptions) -> Document {
    let expander = IncludeExpander::new(options.default_extension.as_str());
    let raw = expander.expand(&strip_comments(source), base_dir);

    let doc_begin = RE_DOC_BEGIN.find(&raw);
    let preamble = match doc_begin {
        Some(m) => &raw[..m.start()],
        None => raw.as_str(),
    };
    let body = match doc_begin {
        Some(begin) => {
            let rest = &raw[begin.end()..];
            match RE_DOC_END.find(rest) {
                Some(end) => &rest[..end.start()],
                None => rest,
            }
        }
        None => raw.as_str(),
    };

    let mut elements = Vec::new();
    if let Some(title) = extract_title(preamble) {
        elements.push(ContentElement::title(title));
    }

    let mut counters = SectionCounters::new();
    BodyWalker::new(&mut elements, &mut counters).walk(body);

    log::debug!("Recovered {} elements", elements.len());
    Document::from_elements(elements)
}

/// Cleaned argument of the first `\title{...}` in `preamble`.
pub fn extract_title(preamble: &str) -> Option<String> {
    let m = RE_TITLE.find(preamble)?;
    let (raw, _) = extract_braced(preamble, m.end() - 1);
    let title = clean(raw);
    (!title.is_empty()).then_some(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        dir
    }

    #[test]
    fn test_title_only() {
        let dir = project(&[(
            "main.tex",
            "\\documentclass{article}\n\\title{Hello World}\n\\begin{document}\n\\maketitle\n\\end{document}\n",
        )]);
        let doc = parse_latex_project(dir.path(), "main.tex").unwrap();
        assert_eq!(doc.elements, vec![ContentElement::title("Hello World")]);
    }

    #[test]
    fn test_missing_entry() {
        let dir = TempDir::new().unwrap();
        let err = parse_latex_project(dir.path(), "main.tex").unwrap_err();
        assert!(matches!(err, Error::NotFound(p) if p.ends_with("main.tex")));
    }

    #[test]
    fn test_text_after_end_document_ignored() {
        let dir = project(&[(
            "paper.tex",
            "\\begin{document}\nThe only paragraph in the body.\n\\end{document}\nTrailing notes after the end.",
        )]);
        let doc = parse_latex_project(dir.path(), "paper.tex").unwrap();
        assert_eq!(
            doc.elements,
            vec![ContentElement::paragraph("The only paragraph in the body.")]
        );
    }

    #[test]
    fn test_no_document_environment() {
        let doc = parse_latex_source(
            "\\section{Standalone}\nA fragment without a document environment.",
            Path::new("."),
            &LatexOptions::default(),
        );
        assert_eq!(
            doc.elements,
            vec![
                ContentElement::headline("1.", "Standalone"),
                ContentElement::paragraph("A fragment without a document environment."),
            ]
        );
    }

    #[test]
    fn test_commented_title_ignored() {
        let stripped = strip_comments("% \\title{Old}\n\\title{\\textbf{New} title}");
        assert_eq!(extract_title(&stripped), Some("New title".to_string()));
        assert_eq!(extract_title("\\title{}"), None);
    }
}
