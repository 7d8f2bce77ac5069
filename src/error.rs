//! Error types
//!
//! Two families: [`CorpusError`] means the corpus violates the expected
//! schema and the run cannot continue; [`DependencyError`] is scoped to a
//! single sentence's dependency and analysis moves on to the next sentence.

use thiserror::Error;

use crate::bracket::Rule;

/// Fatal structural violation in the input corpus
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Corpus error: I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corpus error: XML syntax at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Corpus error: <{element}> element is missing the `{attribute}` attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Corpus error: node {id} referenced by {referenced_by} is not in the graph")]
    UnknownNode { id: String, referenced_by: String },

    #[error("Corpus error: sentence {sent_id} has no constituency root")]
    MissingRoot { sent_id: String },

    #[error("Corpus error: node {id} is reached twice; the constituency layer is not a tree")]
    NotATree { id: String },

    #[error("Corpus error: <{element}> found outside of a sentence")]
    Misplaced { element: &'static str },

    #[error("Corpus error: bracket notation did not parse: {0}")]
    Bracket(#[from] Box<pest::error::Error<Rule>>),
}

impl From<pest::error::Error<Rule>> for CorpusError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        CorpusError::Bracket(Box::new(err))
    }
}

/// Recoverable failure while analysing one dependency
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DependencyError {
    #[error("no grammatical function found for level {level} (PRED {pred_value}); probably a rhetorical question")]
    PositionNotFound { level: String, pred_value: String },

    #[error("no edge leads up from level {level}{}", label.as_ref().map(|l| format!(" with label {l}")).unwrap_or_default())]
    NoParentEdge { level: String, label: Option<String> },

    #[error("ascent from level {level} exceeded {max_depth} steps without reaching the root")]
    DepthExceeded { level: String, max_depth: usize },

    #[error("truncation point {truncation_point} is not on the path")]
    TruncationMismatch { truncation_point: String },

    #[error("marker element `{token}` has no following element to attach to")]
    DanglingMarker { token: String },
}

/// Coarse failure taxonomy used for counting and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCategory {
    LookupFailure,
    AscentFailure,
    TruncationMismatch,
    CleaningFailure,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::LookupFailure => "lookup",
            ErrorCategory::AscentFailure => "ascent",
            ErrorCategory::TruncationMismatch => "truncation",
            ErrorCategory::CleaningFailure => "cleaning",
        }
    }
}

impl DependencyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DependencyError::PositionNotFound { .. } => ErrorCategory::LookupFailure,
            DependencyError::NoParentEdge { .. } | DependencyError::DepthExceeded { .. } => {
                ErrorCategory::AscentFailure
            }
            DependencyError::TruncationMismatch { .. } => ErrorCategory::TruncationMismatch,
            DependencyError::DanglingMarker { .. } => ErrorCategory::CleaningFailure,
        }
    }
}
