//! fgpath: Filler-gap path extraction from LFG treebanks
//!
//! Reads TIGER-XML exports carrying both c-structure and f-structure
//! annotation, finds relativization or wh-dependencies, and extracts the
//! chain of clause levels between the filler and the gap.

// Core modules
pub mod analysis; // Per-sentence pipeline and run diagnostics
pub mod bracket; // Bracket-notation rendering and parsing
pub mod config; // Analysis settings
pub mod corpus; // TIGER-XML sentence reader
pub mod error;
pub mod fstructure; // F-structure view with edge indices
pub mod ids; // Identifier helpers
pub mod locate; // Predicates, dependency edges, syntactic positions
pub mod output; // CSV rows and reports
pub mod path; // Path tracing, annotation, truncation, cleaning
pub mod text; // Surface text extraction
pub mod tree; // Constituency graph

// Re-exports for convenience
pub use analysis::{
    AnalysisRow, Analyzer, CorpusAnalysis, Diagnostics, DependencyResult, RunSummary,
    SentenceOutcome, SkipReason,
};
pub use config::{AnalysisConfig, DependencyType};
pub use corpus::{CorpusReader, SentenceIds, SentenceParse};
pub use error::{CorpusError, DependencyError, ErrorCategory};
pub use fstructure::FStructure;
pub use locate::{GrammaticalFunction, Position};
pub use output::{HEADER, ResultWriter};
pub use path::{EmbeddingPath, FirstStep, PathStep, clean_path};
pub use text::extract_text;
pub use tree::ConstituencyGraph;
