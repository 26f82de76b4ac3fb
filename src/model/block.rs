//! Page-level layout types reported by a PDF page-block provider.
//!
//! Vertical coordinates are page-relative and grow downwards, so `y0` is the
//! top edge of a block and `y1` its bottom edge.

use serde::{Deserialize, Serialize};

/// Kind of a positioned block on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// A run of text lines
    Text,
    /// A placed image
    Image,
}

/// A positioned block of raw text (or an image placeholder) on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageBlock {
    /// Block kind
    pub kind: BlockKind,
    /// Top edge
    pub y0: f32,
    /// Bottom edge
    pub y1: f32,
    /// Raw, line-broken text (empty for images)
    pub text: String,
}

impl PageBlock {
    /// Create a text block.
    pub fn text(y0: f32, y1: f32, text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Text,
            y0,
            y1,
            text: text.into(),
        }
    }

    /// Create an image block.
    pub fn image(y0: f32, y1: f32) -> Self {
        Self {
            kind: BlockKind::Image,
            y0,
            y1,
            text: String::new(),
        }
    }

    /// Check if this block is an image.
    pub fn is_image(&self) -> bool {
        self.kind == BlockKind::Image
    }

    /// Block height.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// Bounding rectangle of a detected table.
///
/// Only used to exclude overlapping text blocks; never retained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableRegion {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl TableRegion {
    /// Create a new region.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Check whether the horizontal band `[y0, y1]` overlaps this region.
    pub fn overlaps_band(&self, y0: f32, y1: f32) -> bool {
        y1 > self.y0 && y0 < self.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_variants() {
        let img = PageBlock::image(10.0, 50.0);
        assert!(img.is_image());
        assert_eq!(img.height(), 40.0);

        let txt = PageBlock::text(0.0, 12.0, "hello\n");
        assert!(!txt.is_image());
    }

    #[test]
    fn test_region_overlap() {
        let region = TableRegion::new(50.0, 100.0, 400.0, 200.0);
        assert!(region.overlaps_band(90.0, 110.0));
        assert!(region.overlaps_band(150.0, 160.0));
        assert!(region.overlaps_band(190.0, 250.0));
        // Touching edges do not overlap
        assert!(!region.overlaps_band(80.0, 100.0));
        assert!(!region.overlaps_band(200.0, 220.0));
        assert!(!region.overlaps_band(10.0, 20.0));
    }
}
