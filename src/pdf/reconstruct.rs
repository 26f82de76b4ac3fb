//! Prose reconstruction from page blocks.

use std::path::Path;

use rayon::prelude::*;

use crate::error::{Error, Result};

use super::normalize::ParagraphNormalizer;
use super::options::ReconstructOptions;
use super::provider::{LopdfProvider, PageBlockProvider};

/// Reconstruct clean paragraph text from a page-block provider.
///
/// Every requested page index must lie in `[0, page_count)`. Image blocks
/// and text blocks overlapping a detected table are dropped; the remaining
/// page text is joined with newlines and run through paragraph
/// normalization.
pub fn reconstruct<P>(provider: &P, options: &ReconstructOptions) -> Result<String>
where
    P: PageBlockProvider + Sync + ?Sized,
{
    let page_count = provider.page_count();
    if let Some(bad) = options.pages.first_out_of_range(page_count) {
        return Err(Error::PageOutOfRange(bad, page_count));
    }
    let indices = options.pages.indices(page_count);

    let page_texts: Vec<String> = if options.parallel {
        indices
            .par_iter()
            .map(|&i| page_text(provider, i, options))
            .collect::<Result<_>>()?
    } else {
        indices
            .iter()
            .map(|&i| page_text(provider, i, options))
            .collect::<Result<_>>()?
    };

    let raw = page_texts.join("\n");
    let normalizer = ParagraphNormalizer::new(options.paragraphs.clone());
    Ok(normalizer.normalize(&raw))
}

/// Open a PDF file and reconstruct its prose.
pub fn reconstruct_file<P: AsRef<Path>>(path: P, options: &ReconstructOptions) -> Result<String> {
    let provider = LopdfProvider::open(path)?;
    reconstruct(&provider, options)
}

/// Kept text of one page, blocks concatenated in provider order.
fn page_text<P>(provider: &P, index: usize, options: &ReconstructOptions) -> Result<String>
where
    P: PageBlockProvider + ?Sized,
{
    let regions = if options.detect_tables {
        provider.table_regions(index).unwrap_or_else(|e| {
            log::warn!("Table detection failed on page {}: {}", index, e);
            Vec::new()
        })
    } else {
        Vec::new()
    };

    let blocks = provider.page_blocks(index)?;
    let total = blocks.len();

    let mut text = String::new();
    let mut kept = 0;
    for block in blocks {
        if block.is_image() {
            continue;
        }
        if regions.iter().any(|r| r.overlaps_band(block.y0, block.y1)) {
            continue;
        }
        text.push_str(&block.text);
        kept += 1;
    }

    log::debug!(
        "Page {}: kept {} of {} blocks ({} table regions)",
        index,
        kept,
        total,
        regions.len()
    );

    Ok(text)
}
