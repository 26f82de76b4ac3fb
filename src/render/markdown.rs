//! Markdown rendering of element streams.

use crate::model::{ContentElement, Document};

use super::{DocumentStats, RenderResult};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document) -> String {
    MarkdownRenderer::new().render(doc)
}

/// Convert a document to Markdown with statistics.
pub fn to_markdown_with_stats(doc: &Document) -> RenderResult {
    MarkdownRenderer::new().render_with_stats(doc)
}

/// Markdown renderer.
///
/// The title becomes a level-1 heading and headlines start at level 2,
/// one level deeper per label component. Tables are rendered as pipe
/// tables with the first row as header.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    escape_special_chars: bool,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new() -> Self {
        Self {
            escape_special_chars: true,
        }
    }

    /// Enable or disable escaping of Markdown syntax characters.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Render a document to Markdown.
    pub fn render(&self, doc: &Document) -> String {
        let mut output = String::new();
        for element in doc {
            self.render_element(&mut output, element);
        }
        output.trim().to_string()
    }

    /// Render a document to Markdown with statistics.
    pub fn render_with_stats(&self, doc: &Document) -> RenderResult {
        let content = self.render(doc);
        RenderResult::new(content, DocumentStats::from_document(doc))
    }

    fn render_element(&self, output: &mut String, element: &ContentElement) {
        match element {
            ContentElement::Title { text } => {
                output.push_str("# ");
                output.push_str(&self.escape(text));
                output.push_str("\n\n");
            }
            ContentElement::Abstract { text } => {
                output.push_str("**Abstract.** ");
                output.push_str(&self.escape(text));
                output.push_str("\n\n");
            }
            ContentElement::Headline { label, text } => {
                let level = heading_level(label);
                output.push_str(&"#".repeat(level));
                output.push(' ');
                output.push_str(label);
                if !text.is_empty() {
                    output.push(' ');
                    output.push_str(&self.escape(text));
                }
                output.push_str("\n\n");
            }
            ContentElement::Paragraph { text } => {
                output.push_str(&self.escape(text));
                output.push_str("\n\n");
            }
            ContentElement::Table { rows } => self.render_table(output, rows),
            ContentElement::TableCaption { text } | ContentElement::FigureCaption { text } => {
                output.push('*');
                output.push_str(&self.escape(text));
                output.push_str("*\n\n");
            }
        }
    }

    fn render_table(&self, output: &mut String, rows: &str) {
        let rows: Vec<Vec<String>> = rows
            .lines()
            .map(split_cells)
            .filter(|cells| !cells.is_empty())
            .collect();
        let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        if col_count == 0 {
            return;
        }

        for (i, row) in rows.iter().enumerate() {
            output.push('|');
            for col in 0..col_count {
                let cell = row.get(col).map(String::as_str).unwrap_or("");
                output.push_str(&format!(" {} |", self.escape(cell)));
            }
            output.push('\n');

            if i == 0 {
                output.push('|');
                output.push_str(&" --- |".repeat(col_count));
                output.push('\n');
            }
        }

        output.push('\n');
    }

    fn escape(&self, text: &str) -> String {
        if self.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Heading level for a section label: `"2."` is 2, `"2.1"` is 3.
fn heading_level(label: &str) -> usize {
    let depth = label.split('.').filter(|part| !part.is_empty()).count();
    (depth + 1).clamp(2, 6)
}

/// Split a table row on runs of two or more spaces.
fn split_cells(row: &str) -> Vec<String> {
    row.split("  ")
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

/// Escape special Markdown characters.
/// Only escape characters that could be misinterpreted as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
