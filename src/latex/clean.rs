//! Markup-to-text cleaning.
//!
//! [`clean`] runs a fixed, ordered list of regex rewrite passes. Order
//! matters: math is replaced before commands are unwrapped, and escaped
//! characters are only un-escaped once no command can swallow them.
//! Unwrapping passes repeat so that nesting up to [`UNWRAP_PASSES`] levels
//! deep is fully resolved.

use std::sync::LazyLock;

use regex::Regex;

/// Repetitions of each unwrapping pass; deeper nesting keeps its innermost
/// command names as spaces.
pub const UNWRAP_PASSES: usize = 4;

/// One rewrite step of the cleaning pipeline.
#[derive(Debug)]
struct RewritePass {
    name: &'static str,
    pattern: Regex,
    replacement: &'static str,
    repeat: usize,
}

impl RewritePass {
    fn once(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self::repeated(name, pattern, replacement, 1)
    }

    fn repeated(name: &'static str, pattern: &str, replacement: &'static str, repeat: usize) -> Self {
        let pattern = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("invalid pattern for clean pass `{}`: {}", name, e));
        Self {
            name,
            pattern,
            replacement,
            repeat,
        }
    }

    fn apply(&self, text: String) -> String {
        let mut text = text;
        for _ in 0..self.repeat {
            let replaced = self.pattern.replace_all(&text, self.replacement);
            if let std::borrow::Cow::Owned(s) = replaced {
                log::trace!("clean pass {} rewrote {} bytes", self.name, text.len());
                text = s;
            } else {
                break;
            }
        }
        text
    }
}

const DISPLAY_MATH_ENVS: &str = "equation|align|eqnarray|gather|multline|displaymath";

static PASSES: LazyLock<Vec<RewritePass>> = LazyLock::new(|| {
    vec![
        // math
        RewritePass::once(
            "display-math",
            &format!(
                r"(?s)\\begin\{{(?:{envs})\*?\}}.*?\\end\{{(?:{envs})\*?\}}",
                envs = DISPLAY_MATH_ENVS
            ),
            " formula ",
        ),
        RewritePass::once("double-dollar", r"(?s)\$\$.*?\$\$", " formula "),
        RewritePass::once("inline-math", r"\$[^$\n]{0,200}\$", "formula"),
        // spacing and layout
        RewritePass::once(
            "spacing",
            r"\\(?:noindent|bigskip|medskip|smallskip|vfill|hfill)\b",
            " ",
        ),
        RewritePass::once("dimension-spacing", r"\\(?:vspace|hspace)\*?\{[^}]*\}", " "),
        RewritePass::once("line-break", r"\\(?:newline|linebreak)\b\*?", " "),
        RewritePass::once("row-break", r"\\\\(?:\[[^\]]*\])?", " "),
        RewritePass::once(
            "page-commands",
            r"\\(?:newpage|clearpage|cleardoublepage|maketitle|tableofcontents|bibliographystyle|bibliography)\b(?:\{[^}]*\})?",
            "",
        ),
        // content-free references
        RewritePass::once(
            "references",
            r"\\(?:cite[a-z]*|ref|eqref|label|pageref)\{[^}]*\}",
            "",
        ),
        RewritePass::once(
            "footnote",
            r"\\footnote\{[^{}]*(?:\{[^{}]*\}[^{}]*)?\}",
            "",
        ),
        RewritePass::once(
            "graphics",
            r"\\includegraphics\s*(?:\[[^\]]*\])?\{[^}]*\}",
            "",
        ),
        // links keep their visible text
        RewritePass::once("url", r"\\url\{([^}]*)\}", "${1}"),
        RewritePass::once("href", r"\\href\{[^}]*\}\{([^{}]*)\}", "${1}"),
        RewritePass::repeated(
            "formatting",
            r"\\(?:textbf|textit|emph|texttt|textrm|textsc|textup|textsf|textmd|text)\{([^{}]*)\}",
            "${1}",
            UNWRAP_PASSES,
        ),
        RewritePass::once("tie", r"~", " "),
        RewritePass::repeated("unwrap", r"\\[a-zA-Z]+\*?\{([^{}]*)\}", "${1}", UNWRAP_PASSES),
        RewritePass::once("bare-command", r"\\[a-zA-Z]+\*?", " "),
        RewritePass::once("escapes", r"\\([%$&#_{}|<>])", "${1}"),
        RewritePass::once("braces", r"[{}]", ""),
        // typography and whitespace
        RewritePass::once("em-dash", r"---", "\u{2014}"),
        RewritePass::once("en-dash", r"--", "\u{2013}"),
        RewritePass::once("horizontal-space", r"[ \t]+", " "),
        RewritePass::once("blank-lines", r"\n{3,}", "\n\n"),
    ]
});

/// Convert a markup fragment to plain text.
///
/// Math becomes the word `formula`, references and footnotes disappear,
/// formatting commands are unwrapped to their content and the result is
/// trimmed.
pub fn clean(text: &str) -> String {
    let cleaned = PASSES
        .iter()
        .fold(text.to_string(), |acc, pass| pass.apply(acc));
    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass_names() -> Vec<&'static str> {
        PASSES.iter().map(|p| p.name).collect()
    }

    #[test]
    fn test_formatting_unwrapped() {
        assert_eq!(clean(r"\textbf{hello}"), "hello");
        assert_eq!(clean(r"\emph{\textbf{\textit{deep}}} text"), "deep text");
    }

    #[test]
    fn test_citation_removed() {
        let out = clean(r"\cite{smith2020} for details");
        assert!(out.contains("for details"));
        assert!(!out.contains("cite"));
        assert!(!out.contains("smith"));

        let out = clean(r"See Figure~\ref{fig:a} and \citep{b}.");
        assert_eq!(out, "See Figure and .");
    }

    #[test]
    fn test_math_replaced() {
        let out = clean("$p < 0.01$");
        assert!(out.contains("formula"));
        assert!(!out.contains('$'));

        let out = clean("before \\begin{equation}\nE = mc^2\n\\end{equation} after");
        assert_eq!(out, "before formula after");

        assert_eq!(clean("a $$x^2$$ b"), "a formula b");
    }

    #[test]
    fn test_links_keep_text() {
        assert_eq!(clean(r"\url{https://example.org}"), "https://example.org");
        assert_eq!(clean(r"\href{https://example.org}{the site}"), "the site");
    }

    #[test]
    fn test_footnote_and_graphics_removed() {
        assert_eq!(
            clean(r"Claim\footnote{See \emph{appendix}.} holds."),
            "Claim holds."
        );
        assert_eq!(clean(r"\includegraphics[width=3in]{plot.pdf}Done"), "Done");
    }

    #[test]
    fn test_escapes_and_dashes() {
        assert_eq!(clean(r"50\% \& more"), "50% & more");
        assert_eq!(clean("pages 1--3 --- done"), "pages 1\u{2013}3 \u{2014} done");
    }

    #[test]
    fn test_unknown_commands() {
        assert_eq!(clean(r"\mycommand{kept} and \relax gone"), "kept and gone");
        assert_eq!(clean(r"{grouped} text"), "grouped text");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(clean("  a \t  b\n\n\n\nc  "), "a b\n\nc");
    }

    #[test]
    fn test_pass_order() {
        let names = pass_names();
        let pos = |n: &str| names.iter().position(|&p| p == n).unwrap();
        assert!(pos("inline-math") < pos("unwrap"));
        assert!(pos("bare-command") < pos("escapes"));
        assert!(pos("em-dash") < pos("en-dash"));
    }
}
