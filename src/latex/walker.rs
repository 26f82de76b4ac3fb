//! Recursive body walker.
//!
//! The walker scans for section commands, `\appendix` and environment
//! begins, buffering the text in between as prose. Section numbering lives
//! in a [`SectionCounters`] value passed by mutable reference through every
//! recursive descent, so numbering is global to the document regardless of
//! how deeply headings are nested inside wrapper environments.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::ContentElement;

use super::clean::clean;
use super::environments::{handler_for, EnvHandler};
use super::scan::{extract_braced, find_environment_end, skip_optional_arg};
use super::tables::{figure_elements, table_elements};

static RE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\\(?P<section>(?:sub)*section)\b\s*\*?|(?P<appendix>\\appendix\b)|\\begin\s*\{(?P<env>\w+\*?)\}|(?P<maketitle>\\maketitle\b)",
    )
    .expect("valid structure token regex")
});
static RE_PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("valid paragraph break regex"));
static RE_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\item\b\s*").expect("valid item regex"));

/// Deepest heading level (`\subsubsection`).
const MAX_LEVEL: usize = 2;

/// Minimum cleaned length of an emitted paragraph.
const MIN_PARAGRAPH_LEN: usize = 10;

/// Section numbering state for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionCounters {
    counts: [u32; MAX_LEVEL + 1],
    in_appendix: bool,
}

impl SectionCounters {
    /// Fresh counters outside the appendix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `\appendix` has been seen.
    pub fn in_appendix(&self) -> bool {
        self.in_appendix
    }

    /// Current counter values, section first.
    pub fn counts(&self) -> [u32; MAX_LEVEL + 1] {
        self.counts
    }

    /// Switch to appendix numbering and restart every counter.
    pub fn enter_appendix(&mut self) {
        self.in_appendix = true;
        self.counts = [0; MAX_LEVEL + 1];
    }

    /// Advance the counter at `level` (clamped to the deepest level), reset
    /// all deeper ones and return the new label.
    pub fn advance(&mut self, level: usize) -> String {
        let level = level.min(MAX_LEVEL);
        self.counts[level] += 1;
        for deeper in &mut self.counts[level + 1..] {
            *deeper = 0;
        }
        self.label(level)
    }

    /// Label of the current position at `level`: `"2."`, `"2.1"`,
    /// `"2.1.3"`, or with a leading letter in the appendix (`"A."`, `"B.2"`).
    pub fn label(&self, level: usize) -> String {
        let [section, subsection, subsubsection] = self.counts;
        let head = if self.in_appendix {
            appendix_letter(section)
        } else {
            section.to_string()
        };

        match level {
            0 => format!("{}.", head),
            1 => format!("{}.{}", head, subsection),
            _ => format!("{}.{}.{}", head, subsection, subsubsection),
        }
    }
}

/// `1 -> A`, `26 -> Z`, `27 -> AA`; zero (no appendix section yet) stays `0`.
fn appendix_letter(n: u32) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut n = n;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Walks document bodies and appends recovered elements.
#[derive(Debug)]
pub struct BodyWalker<'a> {
    elements: &'a mut Vec<ContentElement>,
    counters: &'a mut SectionCounters,
}

impl<'a> BodyWalker<'a> {
    /// Create a walker writing to `elements` and numbering with `counters`.
    pub fn new(elements: &'a mut Vec<ContentElement>, counters: &'a mut SectionCounters) -> Self {
        Self { elements, counters }
    }

    /// Walk one body of markup.
    pub fn walk(&mut self, text: &str) {
        let mut buffer: Vec<&str> = Vec::new();
        self.walk_into(text, &mut buffer);
        self.flush(&mut buffer);
    }

    /// Walk `text`, appending prose to `buffer`. Only structural tokens
    /// flush, so prose inside transparent environments stays in the
    /// surrounding paragraph.
    fn walk_into<'t>(&mut self, text: &'t str, buffer: &mut Vec<&'t str>) {
        let mut pos = 0;

        while pos < text.len() {
            let Some(caps) = RE_TOKEN.captures_at(text, pos) else {
                buffer.push(&text[pos..]);
                break;
            };
            let Some(token) = caps.get(0) else {
                break;
            };

            if token.start() > pos {
                buffer.push(&text[pos..token.start()]);
            }

            if caps.name("maketitle").is_some() {
                pos = token.end();
            } else if caps.name("appendix").is_some() {
                self.flush(buffer);
                self.counters.enter_appendix();
                log::debug!("Entering appendix");
                pos = token.end();
            } else if let Some(command) = caps.name("section") {
                self.flush(buffer);
                let level = command.as_str().to_ascii_lowercase().matches("sub").count();
                let after_cmd = skip_optional_arg(text, token.end());
                let (raw, after_heading) = extract_braced(text, after_cmd);
                let label = self.counters.advance(level);
                self.elements
                    .push(ContentElement::headline(label, clean(raw)));
                pos = after_heading;
            } else if let Some(env) = caps.name("env") {
                let name = env.as_str().trim_end_matches('*');
                let body_start = skip_optional_arg(text, token.end());
                let (body, after_env) = find_environment_end(text, body_start, name);
                self.environment(name, body, buffer);
                pos = after_env;
            } else {
                pos = token.end();
            }
        }

        self.flush(buffer);
    }

    fn environment<'t>(&mut self, name: &str, body: &'t str, buffer: &mut Vec<&'t str>) {
        let handler = handler_for(name);
        log::debug!("Environment {} -> {:?}", name, handler);

        match handler {
            EnvHandler::Abstract => {
                self.flush(buffer);
                let text = clean(body);
                if !text.is_empty() {
                    self.elements.push(ContentElement::abstract_text(text));
                }
            }
            EnvHandler::Table => {
                self.flush(buffer);
                self.elements.extend(table_elements(body));
            }
            EnvHandler::Figure => {
                self.flush(buffer);
                self.elements.extend(figure_elements(body));
            }
            EnvHandler::List => {
                self.flush(buffer);
                let items = RE_ITEM.replace_all(body, "\n\n");
                self.walk(&items);
            }
            EnvHandler::Transparent => self.walk_into(body, buffer),
            EnvHandler::Skip => {}
        }
    }

    /// Emit buffered prose as paragraphs split on blank lines.
    fn flush(&mut self, buffer: &mut Vec<&str>) {
        if buffer.is_empty() {
            return;
        }
        let joined = buffer.join(" ");
        buffer.clear();

        let before = self.elements.len();
        for chunk in RE_PARAGRAPH_BREAK.split(&joined) {
            let text = clean(chunk);
            if text.chars().count() > MIN_PARAGRAPH_LEN {
                self.elements.push(ContentElement::paragraph(text));
            }
        }
        log::debug!("Flushed {} paragraphs", self.elements.len() - before);
    }
}
