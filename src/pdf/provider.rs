//! Page-block providers.
//!
//! A provider exposes a paginated document as positioned blocks plus a
//! best-effort table-region detector. [`LopdfProvider`] is the built-in
//! implementation; anything else that can report blocks (another PDF
//! library, a cached layout, a test fixture) can implement the trait.

use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{PageBlock, TableRegion};

use super::backend::{LopdfBackend, PdfBackend};
use super::layout::{self, LayoutAnalyzer, PageContent};
use super::table_detector::TableDetector;

/// Source of positioned page blocks.
pub trait PageBlockProvider {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Blocks of page `index` (0-based), in reading order.
    fn page_blocks(&self, index: usize) -> Result<Vec<PageBlock>>;

    /// Bounding boxes of tables detected on page `index`.
    ///
    /// Callers treat a failure here as "no tables".
    fn table_regions(&self, index: usize) -> Result<Vec<TableRegion>>;
}

/// [`PageBlockProvider`] over a PDF parsed with lopdf.
///
/// Every page's content stream is interpreted once, when the provider is
/// built; blocks and table regions are then computed from the cached spans.
#[derive(Debug, Clone)]
pub struct LopdfProvider {
    pages: Vec<PageContent>,
    detector: TableDetector,
}

impl LopdfProvider {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let backend = LopdfBackend::load_file(path)?;
        Ok(Self::from_backend(&backend))
    }

    /// Parse a PDF held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self::from_backend(&backend))
    }

    /// Interpret every page of a backend.
    ///
    /// A page whose content stream cannot be decoded is kept as an empty
    /// page so that page indices stay aligned with the document.
    pub fn from_backend<B: PdfBackend + ?Sized>(backend: &B) -> Self {
        let analyzer = LayoutAnalyzer::new(backend);
        let pages = backend
            .pages()
            .into_iter()
            .map(|(number, id)| {
                analyzer.extract_page(id).unwrap_or_else(|e| {
                    log::warn!("Failed to read page {}: {}", number, e);
                    PageContent {
                        height: backend.page_height(id),
                        ..PageContent::default()
                    }
                })
            })
            .collect();

        Self {
            pages,
            detector: TableDetector::new(),
        }
    }

    /// Use a custom table detector.
    pub fn with_table_detector(mut self, detector: TableDetector) -> Self {
        self.detector = detector;
        self
    }

    fn page(&self, index: usize) -> Result<&PageContent> {
        self.pages
            .get(index)
            .ok_or(Error::PageOutOfRange(index, self.pages.len()))
    }
}

impl PageBlockProvider for LopdfProvider {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_blocks(&self, index: usize) -> Result<Vec<PageBlock>> {
        let page = self.page(index)?;
        let blocks = layout::page_blocks(page);
        log::debug!("Page {}: {} blocks", index, blocks.len());
        Ok(blocks)
    }

    fn table_regions(&self, index: usize) -> Result<Vec<TableRegion>> {
        let page = self
            .page(index)
            .map_err(|e| Error::TableDetection(e.to_string()))?;
        let regions = self.detector.detect_regions(&page.spans, page.height);
        if !regions.is_empty() {
            log::debug!("Page {}: table regions {:?}", index, regions);
        }
        Ok(regions)
    }
}
