//! Speakable text mapping and sentence chunking.

use crate::error::{Error, Result};
use crate::model::{ContentElement, Document};

/// Spoken announcement read before table rows.
pub const TABLE_PREFIX: &str = "Table data: ";

/// Separator between spoken table rows.
const ROW_SEPARATOR: &str = ".  ";

/// Options for splitting text into synthesizer-sized chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkOptions {
    /// Maximum characters per chunk; a longer single sentence is kept whole
    pub max_chars: usize,
}

impl ChunkOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum chunk length in characters.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self { max_chars: 500 }
    }
}

/// Text to read aloud for an element, or `None` if there is nothing to say.
pub fn to_speech_text(element: &ContentElement) -> Option<String> {
    let text = match element {
        ContentElement::Title { text }
        | ContentElement::Abstract { text }
        | ContentElement::Paragraph { text }
        | ContentElement::TableCaption { text }
        | ContentElement::FigureCaption { text } => text.trim().to_string(),
        ContentElement::Headline { label, text } => format!("{} {}", label, text).trim().to_string(),
        ContentElement::Table { rows } => {
            let rows: Vec<&str> = rows
                .lines()
                .map(str::trim)
                .filter(|row| !row.is_empty())
                .collect();
            if rows.is_empty() {
                return None;
            }
            format!("{}{}", TABLE_PREFIX, rows.join(ROW_SEPARATOR))
        }
    };

    (!text.is_empty()).then_some(text)
}

/// Split text into sentences at whitespace following `.`, `!` or `?`.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev = None;
    let mut iter = text.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            sentences.push(&text[start..i]);
            let mut end = i + c.len_utf8();
            while let Some(&(j, w)) = iter.peek() {
                if !w.is_whitespace() {
                    break;
                }
                end = j + w.len_utf8();
                iter.next();
            }
            start = end;
            prev = None;
            continue;
        }
        prev = Some(c);
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Pack sentences greedily into chunks of at most `max_chars` characters.
///
/// Sentences within a chunk are joined by single spaces. A sentence longer
/// than `max_chars` becomes a chunk of its own. Blank input yields no
/// chunks.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for sentence in split_sentences(text.trim()) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        let len = sentence.chars().count();
        if !current.is_empty() && current_len + 1 + len > max_chars {
            chunks.push(current.join(" "));
            current.clear();
            current_len = 0;
        }
        current_len += len + usize::from(!current.is_empty());
        current.push(sentence);
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }
    chunks
}

/// Speakable chunks for a whole document, in element order.
///
/// Fails with [`Error::EmptyContent`] when nothing speakable remains.
pub fn speech_chunks(document: &Document, options: &ChunkOptions) -> Result<Vec<String>> {
    let chunks: Vec<String> = document
        .iter()
        .filter_map(to_speech_text)
        .flat_map(|text| chunk_text(&text, options.max_chars))
        .collect();

    if chunks.is_empty() {
        return Err(Error::EmptyContent(
            "no speakable text in document".to_string(),
        ));
    }

    log::debug!(
        "Split {} elements into {} chunks",
        document.len(),
        chunks.len()
    );
    Ok(chunks)
}
