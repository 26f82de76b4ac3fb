//! Plain text rendering.

use crate::model::Document;

/// Convert a document to plain text.
///
/// Elements are separated by blank lines and headlines keep their labels.
pub fn to_text(doc: &Document) -> String {
    doc.plain_text().trim().to_string()
}
