//! Environment classification.

/// How the body walker treats the content of an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvHandler {
    /// Walk the content in place.
    Transparent,
    /// Discard the content.
    Skip,
    /// Emit the cleaned content as an abstract.
    Abstract,
    /// Extract the tabular body, captions and notes.
    Table,
    /// Emit captions only.
    Figure,
    /// Turn each item into its own paragraph and walk the result.
    List,
}

const HANDLERS: &[(&str, EnvHandler)] = &[
    ("abstract", EnvHandler::Abstract),
    ("table", EnvHandler::Table),
    ("figure", EnvHandler::Figure),
    ("itemize", EnvHandler::List),
    ("enumerate", EnvHandler::List),
    ("description", EnvHandler::List),
    // layout wrappers
    ("document", EnvHandler::Transparent),
    ("center", EnvHandler::Transparent),
    ("flushleft", EnvHandler::Transparent),
    ("flushright", EnvHandler::Transparent),
    ("quote", EnvHandler::Transparent),
    ("quotation", EnvHandler::Transparent),
    ("verse", EnvHandler::Transparent),
    ("minipage", EnvHandler::Transparent),
    ("framed", EnvHandler::Transparent),
    ("mdframed", EnvHandler::Transparent),
    ("tcolorbox", EnvHandler::Transparent),
    ("columns", EnvHandler::Transparent),
    ("column", EnvHandler::Transparent),
    ("frame", EnvHandler::Transparent),
    // drawings, code and raw material
    ("tikzpicture", EnvHandler::Skip),
    ("pgfpicture", EnvHandler::Skip),
    ("lstlisting", EnvHandler::Skip),
    ("verbatim", EnvHandler::Skip),
    ("algorithm", EnvHandler::Skip),
    ("algorithmic", EnvHandler::Skip),
    ("comment", EnvHandler::Skip),
    ("filecontents", EnvHandler::Skip),
    ("thebibliography", EnvHandler::Skip),
    // math
    ("equation", EnvHandler::Skip),
    ("align", EnvHandler::Skip),
    ("eqnarray", EnvHandler::Skip),
    ("gather", EnvHandler::Skip),
    ("multline", EnvHandler::Skip),
    ("displaymath", EnvHandler::Skip),
    ("array", EnvHandler::Skip),
    ("pmatrix", EnvHandler::Skip),
    ("bmatrix", EnvHandler::Skip),
];

/// Look up the handler for an environment name.
///
/// A trailing `*` is ignored. Unknown environments are transparent so that
/// custom wrappers still surface their prose.
pub fn handler_for(name: &str) -> EnvHandler {
    let name = name.trim_end_matches('*');
    HANDLERS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, handler)| handler)
        .unwrap_or(EnvHandler::Transparent)
}
