//! Document-level types.

use super::{ContentElement, ElementKind};
use serde::{Deserialize, Serialize};

/// An ordered sequence of content elements in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Elements in document order
    pub elements: Vec<ContentElement>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Create a document from elements.
    pub fn from_elements(elements: Vec<ContentElement>) -> Self {
        Self { elements }
    }

    /// Append an element.
    pub fn push(&mut self, element: ContentElement) {
        self.elements.push(element);
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate over elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ContentElement> {
        self.elements.iter()
    }

    /// Element kinds in order.
    pub fn kinds(&self) -> Vec<ElementKind> {
        self.elements.iter().map(|e| e.kind()).collect()
    }

    /// Text payloads of every element of the given kind.
    pub fn texts_of(&self, kind: ElementKind) -> Vec<&str> {
        self.elements
            .iter()
            .filter(|e| e.kind() == kind)
            .map(|e| e.text())
            .collect()
    }

    /// Get plain text content of the entire document.
    ///
    /// Headlines are prefixed with their label; elements are separated by a
    /// blank line.
    pub fn plain_text(&self) -> String {
        self.elements
            .iter()
            .map(|e| match e {
                ContentElement::Headline { label, text } => format!("{} {}", label, text),
                other => other.text().to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl IntoIterator for Document {
    type Item = ContentElement;
    type IntoIter = std::vec::IntoIter<ContentElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a ContentElement;
    type IntoIter = std::slice::Iter<'a, ContentElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 0);
    }

    #[test]
    fn test_plain_text_and_filters() {
        let doc = Document::from_elements(vec![
            ContentElement::title("Paper"),
            ContentElement::headline("1.", "Introduction"),
            ContentElement::paragraph("Body text here."),
        ]);

        assert_eq!(
            doc.plain_text(),
            "Paper\n\n1. Introduction\n\nBody text here."
        );
        assert_eq!(doc.texts_of(ElementKind::Headline), vec!["Introduction"]);
        assert_eq!(
            doc.kinds(),
            vec![
                ElementKind::Title,
                ElementKind::Headline,
                ElementKind::Paragraph
            ]
        );
    }
}
