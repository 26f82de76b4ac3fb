//! PDF layout reconstruction.
//!
//! Turns positioned page blocks into clean, noise-free prose paragraphs.
//! The lopdf-backed provider interprets content streams into spans, groups
//! them into blocks and detects table regions from text alignment.

mod backend;
mod layout;
mod normalize;
mod options;
mod provider;
mod reconstruct;
mod table_detector;

pub use backend::{ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue};
pub use normalize::{is_noise, join_lines, ParagraphNormalizer};
pub use options::{PageSelection, ParagraphConfig, ReconstructOptions};
pub use provider::{LopdfProvider, PageBlockProvider};
pub use reconstruct::{reconstruct, reconstruct_file};
pub use table_detector::{TableDetector, TableDetectorConfig};
