//! Table and figure environment handlers.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::ContentElement;

use super::clean::clean;
use super::scan::{extract_braced, find_environment_end, skip_optional_arg, skip_whitespace};

static RE_CAPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\caption\s*(?:\[[^\]]*\])?\s*\{").expect("valid caption regex")
});
static RE_TABULAR_BEGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\begin\s*\{(tabular[x*]?)\}").expect("valid tabular begin regex")
});
static RE_TABULAR_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\end\s*\{tabular[x*]?\}").expect("valid tabular end regex"));
static RE_TABLE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\end\s*\{table\*?\}").expect("valid table end regex"));
static RE_RULES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\\(?:toprule|midrule|bottomrule|hline)\b|\\(?:cline|cmidrule)(?:\([^)]*\))?\{[^}]*\}",
    )
    .expect("valid table rule regex")
});

/// Minimum length of trailing table notes worth keeping.
const MIN_NOTE_LEN: usize = 5;

/// Cell separator in converted table text.
pub const CELL_SEPARATOR: &str = "   ";

/// Cleaned, non-empty captions of an environment body, in order.
pub fn captions(body: &str) -> Vec<String> {
    RE_CAPTION
        .find_iter(body)
        .map(|m| clean(extract_braced(body, m.end() - 1).0))
        .filter(|c| !c.is_empty())
        .collect()
}

/// Convert a tabular body to text.
///
/// Rule commands are dropped, rows split on `\\` and cells on `&`. Empty
/// cells and empty rows are skipped; cells are joined with
/// [`CELL_SEPARATOR`] and rows with newlines.
pub fn tabular_to_text(body: &str) -> String {
    let body = RE_RULES.replace_all(body, "");
    body.split(r"\\")
        .filter_map(|row| {
            let cells: Vec<String> = row
                .split('&')
                .map(clean)
                .filter(|cell| !cell.is_empty())
                .collect();
            (!cells.is_empty()).then(|| cells.join(CELL_SEPARATOR))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Elements of a `table` environment: the table text, then its captions,
/// then any notes following the tabular.
pub fn table_elements(body: &str) -> Vec<ContentElement> {
    let mut elements = Vec::new();

    if let Some(caps) = RE_TABULAR_BEGIN.captures(body) {
        if let (Some(begin), Some(name)) = (caps.get(0), caps.get(1)) {
            let mut after_spec = skip_optional_arg(body, begin.end());
            // tabularx and tabular* take a width before the column spec
            let arg_count = if name.as_str() == "tabular" { 1 } else { 2 };
            for _ in 0..arg_count {
                let arg_start = skip_whitespace(body, after_spec);
                let (_, arg_end) = extract_braced(body, arg_start);
                if arg_end == arg_start {
                    break;
                }
                after_spec = arg_end;
            }
            let (content, _) = find_environment_end(body, after_spec, name.as_str());
            let text = tabular_to_text(content);
            if !text.is_empty() {
                elements.push(ContentElement::table(text));
            }
        }
    }

    elements.extend(captions(body).into_iter().map(ContentElement::table_caption));

    if let Some(end) = RE_TABULAR_END.find(body) {
        let trailing = RE_TABLE_END.replace_all(&body[end.end()..], "");
        // captions were emitted above; notes carry only the remaining text
        let trailing = strip_captions(&trailing);
        let notes = clean(&trailing);
        if notes.chars().count() > MIN_NOTE_LEN {
            elements.push(ContentElement::table_caption(notes));
        }
    }

    elements
}

/// Elements of a `figure` environment: one caption element per caption.
pub fn figure_elements(body: &str) -> Vec<ContentElement> {
    captions(body)
        .into_iter()
        .map(ContentElement::figure_caption)
        .collect()
}

/// Remove caption directives and their arguments, which are already
/// emitted as captions.
fn strip_captions(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for m in RE_CAPTION.find_iter(text) {
        if m.start() < pos {
            continue;
        }
        out.push_str(&text[pos..m.start()]);
        pos = extract_braced(text, m.end() - 1).1;
    }
    if pos < text.len() {
        out.push_str(&text[pos..]);
    }
    out
}
