//! Delimiter-balanced scanning primitives.
//!
//! All positions are byte offsets into the scanned text. Every delimiter
//! the scanners look for is ASCII, so returned positions always fall on
//! character boundaries.

use std::sync::LazyLock;

use regex::Regex;

/// Matches any `\begin{name}` or `\end{name}` directive, starred or not.
static RE_ENV_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(begin|end)\s*\{(\w+)\*?\}").expect("valid environment directive regex")
});

/// Extract the content of a braced group starting at `pos`.
///
/// `pos` must point at the opening `{`. Returns the text between the
/// outermost matching braces and the position just past the closing brace.
/// A character following a backslash never affects nesting depth.
///
/// When `pos` does not point at `{`, returns empty content at `pos`. When
/// the group is never closed, returns the rest of the text and its length.
pub fn extract_braced(text: &str, pos: usize) -> (&str, usize) {
    let bytes = text.as_bytes();
    if pos >= bytes.len() || bytes[pos] != b'{' {
        return ("", pos);
    }

    let mut depth = 0usize;
    let mut i = pos;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return (&text[pos + 1..i], i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }

    (&text[pos + 1..], text.len())
}

/// Skip an optional `[...]` argument after `pos`.
///
/// Leading spaces, tabs and newlines are skipped first. Brackets do not
/// nest. If no argument follows, or it is never closed, `pos` is returned
/// unchanged.
pub fn skip_optional_arg(text: &str, pos: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = pos;
    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | b'\n') {
        i += 1;
    }

    if i < bytes.len() && bytes[i] == b'[' {
        if let Some(offset) = text[i..].find(']') {
            return i + offset + 1;
        }
    }

    pos
}

/// Skip spaces, tabs and newlines starting at `pos`.
pub fn skip_whitespace(text: &str, pos: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = pos;
    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | b'\n') {
        i += 1;
    }
    i
}

/// Find the end of environment `name` whose body starts at `start`.
///
/// Nested environments with the same name are balanced with a depth
/// counter; a trailing `*` on either the name or a directive is ignored.
/// Returns the body and the position just past the matching `\end{...}`.
/// An unterminated environment consumes the rest of the text.
pub fn find_environment_end<'a>(text: &'a str, start: usize, name: &str) -> (&'a str, usize) {
    let name = name.trim_end_matches('*');
    let mut depth = 1usize;

    for caps in RE_ENV_DIRECTIVE.captures_iter(&text[start..]) {
        if &caps[2] != name {
            continue;
        }
        let Some(directive) = caps.get(0) else {
            continue;
        };
        if &caps[1] == "begin" {
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                let end_start = start + directive.start();
                return (&text[start..end_start], start + directive.end());
            }
        }
    }

    (&text[start..], text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_braced() {
        assert_eq!(extract_braced("{a{b}c}", 0), ("a{b}c", 7));
        assert_eq!(extract_braced("hello", 0), ("", 0));
        assert_eq!(extract_braced("x{y}z", 1), ("y", 4));
        assert_eq!(extract_braced("{}", 5), ("", 5));
    }

    #[test]
    fn test_extract_braced_escapes() {
        let text = r"{50\% of \{x\}} rest";
        let (content, end) = extract_braced(text, 0);
        assert_eq!(content, r"50\% of \{x\}");
        assert_eq!(&text[end..], " rest");
    }

    #[test]
    fn test_extract_braced_unclosed() {
        let (content, end) = extract_braced("{open {inner} tail", 0);
        assert_eq!(content, "open {inner} tail");
        assert_eq!(end, 18);
    }

    #[test]
    fn test_extract_braced_multibyte() {
        let text = "{café – ok}!";
        let (content, end) = extract_braced(text, 0);
        assert_eq!(content, "café – ok");
        assert_eq!(&text[end..], "!");
    }

    #[test]
    fn test_skip_optional_arg() {
        assert_eq!(skip_optional_arg("[short]{Long}", 0), 7);
        assert_eq!(skip_optional_arg("  \n[h]{x}", 0), 6);
        assert_eq!(skip_optional_arg("{Long}", 0), 0);
        assert_eq!(skip_optional_arg("  {Long}", 0), 0);
        assert_eq!(skip_optional_arg("[never closed", 0), 0);
    }

    #[test]
    fn test_find_environment_end() {
        let text = r"body \end{quote} after";
        let (body, end) = find_environment_end(text, 0, "quote");
        assert_eq!(body, "body ");
        assert_eq!(&text[end..], " after");
    }

    #[test]
    fn test_find_environment_end_nested() {
        let text = r"a \begin{itemize} b \end{itemize} c \end{itemize} d";
        let (body, end) = find_environment_end(text, 0, "itemize");
        assert_eq!(body, r"a \begin{itemize} b \end{itemize} c ");
        assert_eq!(&text[end..], " d");
    }

    #[test]
    fn test_find_environment_end_other_names_ignored() {
        let text = r"x \begin{tabular}{l} y \end{tabular} \end{table*} z";
        let (body, end) = find_environment_end(text, 0, "table*");
        assert_eq!(body, r"x \begin{tabular}{l} y \end{tabular} ");
        assert_eq!(&text[end..], " z");
    }

    #[test]
    fn test_find_environment_end_unterminated() {
        let text = "never ends";
        assert_eq!(find_environment_end(text, 6, "figure"), ("ends", 10));
    }
}
