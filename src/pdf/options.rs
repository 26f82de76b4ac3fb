//! Reconstruction options and configuration.

use std::ops::Range;

/// Options for reconstructing prose from PDF page blocks.
#[derive(Debug, Clone)]
pub struct ReconstructOptions {
    /// Which pages to read
    pub pages: PageSelection,

    /// Whether to process pages in parallel
    pub parallel: bool,

    /// Whether to ask the provider for table regions
    pub detect_tables: bool,

    /// Paragraph normalization thresholds
    pub paragraphs: ParagraphConfig,
}

impl ReconstructOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Read only pages `start..end` (0-based, end exclusive).
    pub fn with_page_range(mut self, range: Range<usize>) -> Self {
        self.pages = PageSelection::Range(range);
        self
    }

    /// Enable or disable parallel page processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enable or disable table-region exclusion.
    pub fn with_table_detection(mut self, detect: bool) -> Self {
        self.detect_tables = detect;
        self
    }

    /// Set paragraph normalization thresholds.
    pub fn with_paragraphs(mut self, config: ParagraphConfig) -> Self {
        self.paragraphs = config;
        self
    }
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            pages: PageSelection::All,
            parallel: true,
            detect_tables: true,
            paragraphs: ParagraphConfig::default(),
        }
    }
}

/// Thresholds used by paragraph normalization.
///
/// The short-fragment run constants are tuned heuristics, not a contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphConfig {
    /// Lines must be longer than this to count towards the typical length
    pub min_measured_len: usize,

    /// Percentile (0.0-1.0) of measured line lengths taken as typical
    pub typical_percentile: f32,

    /// Lines shorter than `typical * break_ratio` end a paragraph
    pub break_ratio: f32,

    /// Paragraphs shorter than this count as short fragments
    pub short_fragment_len: usize,

    /// Runs of at least this many short fragments are dropped
    pub short_run_min: usize,
}

impl ParagraphConfig {
    /// Set the short-fragment length threshold.
    pub fn with_short_fragment_len(mut self, len: usize) -> Self {
        self.short_fragment_len = len;
        self
    }

    /// Set the minimum run length for short-fragment removal.
    pub fn with_short_run_min(mut self, min: usize) -> Self {
        self.short_run_min = min;
        self
    }
}

impl Default for ParagraphConfig {
    fn default() -> Self {
        Self {
            min_measured_len: 20,
            typical_percentile: 0.75,
            break_ratio: 0.6,
            short_fragment_len: 60,
            short_run_min: 5,
        }
    }
}

/// Page selection (0-based page indices).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Every page of the document
    #[default]
    All,
    /// Pages `start..end`, end exclusive
    Range(Range<usize>),
}

impl PageSelection {
    /// Resolve to the list of requested indices.
    ///
    /// Indices are not validated here; see
    /// [`first_out_of_range`](Self::first_out_of_range).
    pub fn indices(&self, page_count: usize) -> Vec<usize> {
        match self {
            PageSelection::All => (0..page_count).collect(),
            PageSelection::Range(range) => range.clone().collect(),
        }
    }

    /// Smallest requested index that is not below `page_count`, if any.
    ///
    /// Checked before [`indices`](Self::indices) so that an oversized range
    /// is rejected without being materialized.
    pub fn first_out_of_range(&self, page_count: usize) -> Option<usize> {
        match self {
            PageSelection::All => None,
            PageSelection::Range(range) if range.end > page_count && !range.is_empty() => {
                Some(range.start.max(page_count))
            }
            PageSelection::Range(_) => None,
        }
    }

    /// Parse a page selection string: `"all"`, `"3"` or `"2-5"`.
    ///
    /// `"2-5"` selects indices 2, 3 and 4; `"3"` selects index 3 alone.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            let start: usize = start.trim().parse().map_err(|_| "Invalid start page")?;
            let end: usize = end.trim().parse().map_err(|_| "Invalid end page")?;
            if end < start {
                return Err(format!("Invalid page range: {}", s));
            }
            return Ok(PageSelection::Range(start..end));
        }

        let page: usize = s.parse().map_err(|_| "Invalid page number")?;
        Ok(PageSelection::Range(page..page + 1))
    }
}
