//! Source preprocessing: comment stripping and file inclusion.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static RE_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\input\s*\{([^}]+)\}").expect("valid input regex"));
static RE_INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\include\s*\{([^}]+)\}").expect("valid include regex"));

/// Inclusion depth at which expansion stops (guards against include cycles).
const MAX_INCLUDE_DEPTH: usize = 32;

/// Remove `%` comments.
///
/// A `%` not directly preceded by a backslash starts a comment that runs to
/// the end of the line. The newline itself is kept.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev = None;
    let mut in_comment = false;

    for c in text.chars() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
                out.push(c);
            }
        } else if c == '%' && prev != Some('\\') {
            in_comment = true;
        } else {
            out.push(c);
        }
        prev = Some(c);
    }

    out
}

/// Expands `\input{...}` and `\include{...}` directives from disk.
#[derive(Debug, Clone)]
pub struct IncludeExpander {
    extension: String,
}

impl IncludeExpander {
    /// Create an expander appending `.{extension}` to names without it.
    pub fn new(extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Replace every inclusion directive with the comment-stripped,
    /// recursively expanded content of the named file.
    ///
    /// Names resolve against `base_dir`; an included file's own inclusions
    /// resolve against that file's directory. A missing or unreadable file
    /// expands to nothing.
    pub fn expand(&self, text: &str, base_dir: &Path) -> String {
        self.expand_at_depth(text, base_dir, 0)
    }

    fn expand_at_depth(&self, text: &str, base_dir: &Path, depth: usize) -> String {
        if depth >= MAX_INCLUDE_DEPTH {
            log::warn!(
                "Include depth limit ({}) reached under {}",
                MAX_INCLUDE_DEPTH,
                base_dir.display()
            );
            return text.to_string();
        }

        let replace = |caps: &Captures| self.load(&caps[1], base_dir, depth);
        let text = RE_INPUT.replace_all(text, replace);
        let text = RE_INCLUDE.replace_all(&text, replace);
        text.into_owned()
    }

    fn load(&self, name: &str, base_dir: &Path, depth: usize) -> String {
        let mut name = name.trim().to_string();
        let suffix = format!(".{}", self.extension);
        if !name.ends_with(&suffix) {
            name.push_str(&suffix);
        }

        let path = base_dir.join(&name);
        if !path.is_file() {
            log::warn!("Included file not found: {}", path.display());
            return String::new();
        }

        let content = match fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                log::warn!("Failed to read included file {}: {}", path.display(), e);
                return String::new();
            }
        };

        log::debug!("Expanding include {}", path.display());
        let parent = path.parent().unwrap_or(base_dir);
        self.expand_at_depth(&strip_comments(&content), parent, depth + 1)
    }
}

impl Default for IncludeExpander {
    fn default() -> Self {
        Self::new("tex")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("text % note\nmore"), "text \nmore");
        assert_eq!(strip_comments(r"50\% of cases"), r"50\% of cases");
        assert_eq!(strip_comments("%whole line\n%another"), "\n");
    }

    #[test]
    fn test_expand_nested_includes() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("chapters")).unwrap();
        fs::write(
            dir.path().join("chapters/intro.tex"),
            "Intro text % hidden\n\\input{details}",
        )
        .unwrap();
        fs::write(dir.path().join("chapters/details.tex"), "Details here").unwrap();

        let expanded = IncludeExpander::default().expand(r"\input{chapters/intro}", dir.path());
        assert_eq!(expanded, "Intro text \nDetails here");
    }

    #[test]
    fn test_include_with_extension_and_spacing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.tex"), "AAA").unwrap();

        let expanded =
            IncludeExpander::default().expand(r"[\include { a.tex }]", dir.path());
        assert_eq!(expanded, "[AAA]");
    }

    #[test]
    fn test_missing_include_is_empty() {
        let dir = TempDir::new().unwrap();
        let expanded = IncludeExpander::default().expand(r"before\input{nope}after", dir.path());
        assert_eq!(expanded, "beforeafter");
    }

    #[test]
    fn test_include_cycle_terminates() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("loop.tex"), r"x\input{loop}").unwrap();

        let expanded = IncludeExpander::default().expand(r"\input{loop}", dir.path());
        assert!(expanded.starts_with("xxx"));
    }

    #[test]
    fn test_includegraphics_untouched() {
        let dir = TempDir::new().unwrap();
        let text = r"\includegraphics{plot}";
        assert_eq!(IncludeExpander::default().expand(text, dir.path()), text);
    }
}
