//! Rendering of element streams to text, Markdown and JSON.

mod json;
mod markdown;
mod stats;
mod text;

pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, to_markdown_with_stats, MarkdownRenderer};
pub use stats::{DocumentStats, RenderResult};
pub use text::to_text;
