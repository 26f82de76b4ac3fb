//! LaTeX structure parsing.
//!
//! Turns a LaTeX project into the same element stream the PDF path
//! produces: a title from the preamble, numbered headlines, paragraphs,
//! abstracts, tables and captions. Malformed markup never fails the parse;
//! unmatched braces and unterminated environments consume to the end of
//! input, missing includes expand to nothing.

mod clean;
mod environments;
mod preprocess;
mod project;
mod scan;
mod tables;
mod walker;

pub use clean::{clean, UNWRAP_PASSES};
pub use environments::{handler_for, EnvHandler};
pub use preprocess::{strip_comments, IncludeExpander};
pub use project::{
    extract_title, parse_latex_project, parse_latex_project_with, parse_latex_source, LatexOptions,
};
pub use scan::{extract_braced, find_environment_end, skip_optional_arg};
pub use tables::{figure_elements, table_elements, tabular_to_text};
pub use walker::{BodyWalker, SectionCounters};
