use thiserror::Error;

/// Run-terminating failures. Everything else the pipeline hits degrades to
/// a flagged, still-usable output.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Argument section not found: no line matches heading \"{0}\"")]
    SectionNotFound(String),
}

/// Recoverable conditions surfaced while processing a document. These are
/// logged and reflected as flags in the output rather than raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A pattern matched but the fields could not be extracted; the match
    /// was dropped.
    MalformedCitation { text: String },
    /// A short citation had no earlier full citation sharing its
    /// volume/reporter key.
    UnresolvedShortCitation { text: String },
    /// An id. citation appeared before any other citation.
    UnresolvedId { text: String },
    /// A pinpoint fell outside the plausible page window for its case.
    InvalidPinpoint { text: String, pinpoint: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::MalformedCitation { text } => {
                write!(f, "malformed citation dropped: {}", text)
            }
            Diagnostic::UnresolvedShortCitation { text } => {
                write!(f, "unresolved short citation: {}", text)
            }
            Diagnostic::UnresolvedId { text } => {
                write!(f, "id. citation with no antecedent: {}", text)
            }
            Diagnostic::InvalidPinpoint { text, pinpoint } => {
                write!(f, "pinpoint {} out of range for: {}", pinpoint, text)
            }
        }
    }
}
