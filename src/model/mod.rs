//! Document model types shared by the PDF and LaTeX structure parsers.
//!
//! Both parsers produce an ordered [`Document`] of [`ContentElement`]s;
//! the PDF side additionally works on positioned [`PageBlock`]s and
//! [`TableRegion`]s reported by a page-block provider.

mod block;
mod document;
mod element;

pub use block::{BlockKind, PageBlock, TableRegion};
pub use document::Document;
pub use element::{ContentElement, ElementKind};
