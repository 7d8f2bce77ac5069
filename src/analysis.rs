//! Per-sentence dependency analysis
//!
//! The Analyzer runs the complete pipeline for one sentence:
//! 1. Build the c-structure graph and extract the surface text
//! 2. Locate eligible PRED terminals
//! 3. Find dependency edges into their levels; continue only with exactly one
//! 4. Resolve the predicate's syntactic position
//! 5. Trace, annotate, truncate and clean the path to the filler
//! 6. Emit one row with the path in filler-to-gap order
//!
//! The first label of a cleaned path is the gap's own function, which is
//! already reported as the position, so the emitted path holds only the
//! clause levels crossed between gap and filler.
//!
//! Corpus errors abort the run. Dependency errors end the analysis of
//! that sentence; the row keeps whatever was resolved before the failure.

use std::collections::BTreeMap;

use tracing::{debug, error, info, warn};

use crate::config::AnalysisConfig;
use crate::corpus::{SentenceIds, SentenceParse};
use crate::error::{CorpusError, DependencyError, ErrorCategory};
use crate::fstructure::FStructure;
use crate::locate::{
    DependencyCandidate, Position, failing_labels, find_edges, find_predicates,
    find_syntactic_position,
};
use crate::path::{annotate_clause_types, clean_path, trace_embedding_path, truncate_path};
use crate::text::extract_text;
use crate::tree::ConstituencyGraph;

/// Diagnostics accumulated over a run, in corpus order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Labels on edges into predicate levels that named no grammatical function
    pub failing_labels: Vec<String>,
    /// Sentences whose dependency path was extracted completely
    pub analyzed_ids: Vec<String>,
}

/// Outcome of analysing one dependency
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyResult {
    pub position: Option<Position>,
    /// Clause levels crossed by the dependency, filler first
    pub path: Vec<String>,
    pub failure: Option<DependencyError>,
}

/// One output row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRow {
    pub ids: SentenceIds,
    pub text: String,
    pub dependency: DependencyResult,
}

/// Why a sentence produced no row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoDependency,
    /// Only single-dependency sentences are analysed
    MultipleDependencies(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentenceOutcome {
    Row(AnalysisRow),
    Skipped { sent_id: String, reason: SkipReason },
}

/// Counts for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sentences: usize,
    pub rows: usize,
    pub no_dependency: usize,
    pub multiple_dependencies: usize,
    pub failures: BTreeMap<ErrorCategory, usize>,
}

impl RunSummary {
    fn record(&mut self, outcome: &SentenceOutcome) {
        self.sentences += 1;
        match outcome {
            SentenceOutcome::Row(row) => {
                self.rows += 1;
                if let Some(failure) = &row.dependency.failure {
                    *self.failures.entry(failure.category()).or_default() += 1;
                }
            }
            SentenceOutcome::Skipped { reason, .. } => match reason {
                SkipReason::NoDependency => self.no_dependency += 1,
                SkipReason::MultipleDependencies(_) => self.multiple_dependencies += 1,
            },
        }
    }

    /// Log the summary at info level
    pub fn log(&self) {
        info!(
            sentences = self.sentences,
            rows = self.rows,
            no_dependency = self.no_dependency,
            multiple_dependencies = self.multiple_dependencies,
            "analysis complete"
        );
        for (category, count) in &self.failures {
            info!(category = category.as_str(), count, "dependency failures");
        }
    }
}

/// Result of analysing a whole corpus
#[derive(Debug, Clone, Default)]
pub struct CorpusAnalysis {
    pub rows: Vec<AnalysisRow>,
    pub diagnostics: Diagnostics,
    pub summary: RunSummary,
}

/// Dependency path analyser
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyse every sentence in order, stopping at the first corpus error
    pub fn analyze_corpus<I>(&self, sentences: I) -> Result<CorpusAnalysis, CorpusError>
    where
        I: IntoIterator<Item = Result<SentenceParse, CorpusError>>,
    {
        let mut analysis = CorpusAnalysis::default();
        for sentence in sentences {
            let outcome = self.analyze_sentence(&sentence?, &mut analysis.diagnostics)?;
            analysis.summary.record(&outcome);
            if let SentenceOutcome::Row(row) = outcome {
                analysis.rows.push(row);
            }
        }
        Ok(analysis)
    }

    /// Analyse one sentence
    pub fn analyze_sentence(
        &self,
        sentence: &SentenceParse,
        diagnostics: &mut Diagnostics,
    ) -> Result<SentenceOutcome, CorpusError> {
        let ids = sentence.ids();
        debug!(web_id = %ids.web_id, sent_id = %ids.sent_id, graph_id = %ids.graph_id, "sentence");

        let graph = ConstituencyGraph::build(sentence)?;
        let root = graph.root().ok_or_else(|| CorpusError::MissingRoot {
            sent_id: sentence.id.clone(),
        })?;
        let text = extract_text(&graph, root)?;
        debug!(sent_id = %ids.sent_id, text = %text, "surface text");

        let fs = FStructure::new(sentence);
        let predicates = find_predicates(&fs, &self.config.eligible_values);
        debug!(sent_id = %ids.sent_id, predicates = ?predicates, "eligible predicates");

        let matches = find_edges(&fs, &predicates, self.config.dependency_type.label());
        debug!(
            sent_id = %ids.sent_id,
            dependency_type = %self.config.dependency_type,
            targets = ?matches.targets,
            truncation_points = ?matches.truncation_points,
            "dependency edges"
        );

        let Some(candidate) = matches.single() else {
            let reason = match matches.len() {
                0 => SkipReason::NoDependency,
                n => SkipReason::MultipleDependencies(n),
            };
            debug!(sent_id = %ids.sent_id, ?reason, "sentence skipped");
            return Ok(SentenceOutcome::Skipped {
                sent_id: ids.sent_id,
                reason,
            });
        };

        let dependency = self.analyze_dependency(&fs, &candidate, &ids.sent_id, diagnostics);
        Ok(SentenceOutcome::Row(AnalysisRow {
            ids,
            text,
            dependency,
        }))
    }

    /// Resolve position and path for a single dependency
    pub fn analyze_dependency(
        &self,
        fs: &FStructure<'_>,
        candidate: &DependencyCandidate,
        sent_id: &str,
        diagnostics: &mut Diagnostics,
    ) -> DependencyResult {
        let level = candidate.target.as_str();
        let labels = &self.config.position_labels;
        let mut result = DependencyResult::default();

        let position =
            match find_syntactic_position(fs, level, &candidate.pred_value, &self.config) {
                Ok(position) => position,
                Err(e) => {
                    diagnostics.failing_labels.extend(failing_labels(fs, level, labels));
                    error!(sent_id, error = %e, "position lookup failed");
                    result.failure = Some(e);
                    return result;
                }
            };
        if position == Position::AdjunctFallback {
            diagnostics.failing_labels.extend(failing_labels(fs, level, labels));
            debug!(sent_id, pred_value = %candidate.pred_value, "assigning ADJUNCT to position");
        }
        result.position = Some(position);

        match self.extract_path(fs, candidate, position) {
            Ok(cleaned) => {
                diagnostics.analyzed_ids.push(sent_id.to_string());
                result.path = filler_to_gap(&cleaned);
            }
            Err(e) => {
                match e.category() {
                    ErrorCategory::TruncationMismatch => {
                        warn!(sent_id, error = %e, "path truncation failed")
                    }
                    _ => error!(sent_id, error = %e, "path extraction failed"),
                }
                result.failure = Some(e);
            }
        }
        result
    }

    /// Gap-to-filler path, cleaned and space-joined
    fn extract_path(
        &self,
        fs: &FStructure<'_>,
        candidate: &DependencyCandidate,
        position: Position,
    ) -> Result<String, DependencyError> {
        let path = trace_embedding_path(
            fs,
            &candidate.target,
            position.first_step(self.config.dependency_type.label()),
            self.config.max_depth,
        )?;
        debug!(chain = %path, "embedding path");

        let path = annotate_clause_types(fs, path);
        let truncated = truncate_path(&candidate.truncation_point, &path)?;
        debug!(truncation_point = %candidate.truncation_point, truncated = ?truncated, "truncated path");

        clean_path(&truncated.join(" "))
    }
}

/// Drop the gap's own function and reverse into reading order
///
/// The first cleaned label is the function of the gap itself, which the
/// row already carries in its position column.
fn filler_to_gap(cleaned: &str) -> Vec<String> {
    let mut labels: Vec<String> = cleaned.split_whitespace().skip(1).map(str::to_string).collect();
    labels.reverse();
    labels
}
