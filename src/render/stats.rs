//! Rendering result and element statistics.

use crate::model::{ContentElement, Document};
use serde::{Deserialize, Serialize};

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content (Markdown, text, etc.)
    pub content: String,

    /// Statistics of the rendered document
    pub stats: DocumentStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: DocumentStats) -> Self {
        Self { content, stats }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Counts of recovered elements and text volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Number of headlines
    pub headline_count: u32,

    /// Number of paragraphs
    pub paragraph_count: u32,

    /// Number of tables
    pub table_count: u32,

    /// Number of table and figure captions
    pub caption_count: u32,

    /// Whether a title was recovered
    pub has_title: bool,

    /// Whether an abstract was recovered
    pub has_abstract: bool,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl DocumentStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics for a whole document.
    pub fn from_document(doc: &Document) -> Self {
        let mut stats = Self::new();
        for element in doc {
            stats.add_element(element);
        }
        stats
    }

    /// Count one element and its text.
    pub fn add_element(&mut self, element: &ContentElement) {
        match element {
            ContentElement::Title { .. } => self.has_title = true,
            ContentElement::Abstract { .. } => self.has_abstract = true,
            ContentElement::Headline { .. } => self.headline_count += 1,
            ContentElement::Paragraph { .. } => self.paragraph_count += 1,
            ContentElement::Table { .. } => self.table_count += 1,
            ContentElement::TableCaption { .. } | ContentElement::FigureCaption { .. } => {
                self.caption_count += 1
            }
        }
        self.count_text(element.text());
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}
