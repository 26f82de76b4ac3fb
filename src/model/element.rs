//! Content elements produced by both structure parsers.

use serde::{Deserialize, Serialize};

/// One typed unit of recovered document structure.
///
/// Every variant carries exactly one text payload; `Headline` additionally
/// carries its precomputed section label (`"2.1"`, `"A."`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentElement {
    /// Document title from the preamble
    Title {
        /// Cleaned title text
        text: String,
    },

    /// Abstract body
    Abstract {
        /// Cleaned abstract text
        text: String,
    },

    /// Numbered section heading
    Headline {
        /// Section label such as `"1."`, `"2.1"` or `"A.3"`
        label: String,
        /// Cleaned heading text
        text: String,
    },

    /// A prose paragraph
    Paragraph {
        /// Cleaned paragraph text
        text: String,
    },

    /// Tabular data, one row per line with cells separated by three spaces
    Table {
        /// Rows rendered as text
        rows: String,
    },

    /// Caption or note attached to a table
    TableCaption {
        /// Cleaned caption text
        text: String,
    },

    /// Caption attached to a figure
    FigureCaption {
        /// Cleaned caption text
        text: String,
    },
}

/// Discriminant of a [`ContentElement`], useful for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Title,
    Abstract,
    Headline,
    Paragraph,
    Table,
    TableCaption,
    FigureCaption,
}

impl ContentElement {
    /// Create a title element.
    pub fn title(text: impl Into<String>) -> Self {
        ContentElement::Title { text: text.into() }
    }

    /// Create an abstract element.
    pub fn abstract_text(text: impl Into<String>) -> Self {
        ContentElement::Abstract { text: text.into() }
    }

    /// Create a headline element.
    pub fn headline(label: impl Into<String>, text: impl Into<String>) -> Self {
        ContentElement::Headline {
            label: label.into(),
            text: text.into(),
        }
    }

    /// Create a paragraph element.
    pub fn paragraph(text: impl Into<String>) -> Self {
        ContentElement::Paragraph { text: text.into() }
    }

    /// Create a table element.
    pub fn table(rows: impl Into<String>) -> Self {
        ContentElement::Table { rows: rows.into() }
    }

    /// Create a table caption element.
    pub fn table_caption(text: impl Into<String>) -> Self {
        ContentElement::TableCaption { text: text.into() }
    }

    /// Create a figure caption element.
    pub fn figure_caption(text: impl Into<String>) -> Self {
        ContentElement::FigureCaption { text: text.into() }
    }

    /// Get the element kind.
    pub fn kind(&self) -> ElementKind {
        match self {
            ContentElement::Title { .. } => ElementKind::Title,
            ContentElement::Abstract { .. } => ElementKind::Abstract,
            ContentElement::Headline { .. } => ElementKind::Headline,
            ContentElement::Paragraph { .. } => ElementKind::Paragraph,
            ContentElement::Table { .. } => ElementKind::Table,
            ContentElement::TableCaption { .. } => ElementKind::TableCaption,
            ContentElement::FigureCaption { .. } => ElementKind::FigureCaption,
        }
    }

    /// Get the text payload (table rows for `Table`).
    pub fn text(&self) -> &str {
        match self {
            ContentElement::Title { text }
            | ContentElement::Abstract { text }
            | ContentElement::Headline { text, .. }
            | ContentElement::Paragraph { text }
            | ContentElement::TableCaption { text }
            | ContentElement::FigureCaption { text } => text,
            ContentElement::Table { rows } => rows,
        }
    }

    /// Get the section label of a headline.
    pub fn label(&self) -> Option<&str> {
        match self {
            ContentElement::Headline { label, .. } => Some(label),
            _ => None,
        }
    }

    /// Check if this element is a headline.
    pub fn is_headline(&self) -> bool {
        matches!(self, ContentElement::Headline { .. })
    }

    /// Check if this element is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, ContentElement::Table { .. })
    }
}
