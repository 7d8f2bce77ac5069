//! Dependency paths through the f-structure
//!
//! The path of a dependency is the chain of edges from the predicate's
//! level up to the f-structure root. It is built in four stages:
//!
//! 1. [`trace_embedding_path`] ascends parent edges until `_f_0`
//! 2. [`annotate_clause_types`] tags steps with their clause type
//! 3. [`truncate_path`] cuts the path at the level embedding the filler
//! 4. [`clean_path`] removes set markers (`$`) left by bracketed levels

use crate::error::DependencyError;
use crate::fstructure::FStructure;
use crate::ids::{SET_MARKER, contains_level, is_root_level, strip_attribute};
use rustc_hash::FxHashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Marker closing every traced chain
pub const TOP: &str = "TOP";

/// Separator between chain elements
const LINK: &str = " <- ";

/// Terminal id suffixes that carry clause or statement type
const CLAUSE_ATTRIBUTES: [&str; 2] = ["STMT-TYPE", "CLAUSE-TYPE"];

/// One step of the ascent: the level left and the label of the edge into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    pub level: String,
    pub label: String,
    pub clause_type: Option<String>,
}

impl PathStep {
    pub fn new(level: &str, label: &str) -> Self {
        Self {
            level: level.to_string(),
            label: label.to_string(),
            clause_type: None,
        }
    }

    /// Label suffixed with the clause type, e.g. `COMP_decl`
    pub fn tagged_label(&self) -> String {
        match &self.clause_type {
            Some(clause_type) => format!("{}_{}", self.label, clause_type),
            None => self.label.clone(),
        }
    }
}

/// Steps from a predicate's level up to (excluding) the root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddingPath {
    pub steps: Vec<PathStep>,
}

impl EmbeddingPath {
    pub fn labels(&self) -> Vec<String> {
        self.steps.iter().map(PathStep::tagged_label).collect()
    }
}

/// Renders as `s1_f_4, SUBJ <- s1_f_3, COMP <- TOP`
impl fmt::Display for EmbeddingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "{}, {}{}", step.level, step.label, LINK)?;
        }
        f.write_str(TOP)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Chain error: {0}")]
pub struct ChainParseError(String);

impl FromStr for EmbeddingPath {
    type Err = ChainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(body) = s.strip_suffix(TOP) else {
            return Err(ChainParseError(format!("chain does not end in {TOP}: {s}")));
        };
        let steps = body
            .split_terminator(LINK)
            .map(|element| {
                element
                    .split_once(", ")
                    .map(|(level, label)| PathStep::new(level, label))
                    .ok_or_else(|| ChainParseError(format!("expected `level, label`: {element}")))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { steps })
    }
}

/// Constraint on the first ascent step out of the gap level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstStep<'a> {
    /// First edge in document order
    Any,
    /// Only an edge carrying this label
    Labelled(&'a str),
    /// Any edge except those carrying this label, i.e. the filler edge
    Except(&'a str),
}

impl FirstStep<'_> {
    fn admits(&self, label: &str) -> bool {
        match self {
            FirstStep::Any => true,
            FirstStep::Labelled(required) => label == *required,
            FirstStep::Except(excluded) => label != *excluded,
        }
    }

    fn required_label(&self) -> Option<String> {
        match self {
            FirstStep::Labelled(label) => Some(label.to_string()),
            _ => None,
        }
    }
}

/// Ascend from `start` to the f-structure root
///
/// At each level the first edge pointing at it (document order) leads to
/// the parent. `first` restricts which edge the first step may follow.
pub fn trace_embedding_path(
    fs: &FStructure<'_>,
    start: &str,
    first: FirstStep<'_>,
    max_depth: usize,
) -> Result<EmbeddingPath, DependencyError> {
    let mut steps: Vec<PathStep> = Vec::new();
    let mut current = start;
    let mut constraint = Some(first);

    while !is_root_level(current) {
        if steps.len() >= max_depth {
            return Err(DependencyError::DepthExceeded {
                level: start.to_string(),
                max_depth,
            });
        }
        let parent = fs
            .edges_to(current)
            .find(|e| constraint.is_none_or(|c| c.admits(e.label)))
            .ok_or_else(|| DependencyError::NoParentEdge {
                level: current.to_string(),
                label: constraint.and_then(|c| c.required_label()),
            })?;
        steps.push(PathStep::new(current, parent.label));
        current = parent.owner;
        constraint = None;
    }

    Ok(EmbeddingPath { steps })
}

/// Clause type per level, from `*_STMT-TYPE` and `*_CLAUSE-TYPE` terminals
///
/// When a level carries both, the later terminal wins.
pub fn clause_types<'s>(fs: &FStructure<'s>) -> FxHashMap<&'s str, &'s str> {
    let mut types = FxHashMap::default();
    for t in fs.terminals() {
        let Some(val) = t.val.as_deref() else {
            continue;
        };
        if let Some(level) = CLAUSE_ATTRIBUTES
            .iter()
            .find_map(|attr| strip_attribute(&t.id, attr))
        {
            types.insert(level, val);
        }
    }
    types
}

/// Tag each step whose level has a clause type
pub fn annotate_clause_types(fs: &FStructure<'_>, mut path: EmbeddingPath) -> EmbeddingPath {
    let types = clause_types(fs);
    for step in &mut path.steps {
        step.clause_type = types.get(step.level.as_str()).map(|t| t.to_string());
    }
    path
}

/// Labels of the steps below `truncation_point`
///
/// The cut falls at the first step whose level contains the truncation
/// point not followed by another digit, so `s1_f_1` cuts at `s1_f_1` but
/// not at `s1_f_12`. The root never appears as a step, so a root
/// truncation point keeps the whole path.
pub fn truncate_path(
    truncation_point: &str,
    path: &EmbeddingPath,
) -> Result<Vec<String>, DependencyError> {
    let labels = path.labels();
    match path
        .steps
        .iter()
        .position(|step| contains_level(&step.level, truncation_point))
    {
        Some(hit) => Ok(labels[..hit].to_vec()),
        None if is_root_level(truncation_point) => Ok(labels),
        None => Err(DependencyError::TruncationMismatch {
            truncation_point: truncation_point.to_string(),
        }),
    }
}

/// Remove set markers from a space-joined label path
///
/// An element starting with `$` stands for a bracketed (set-valued) level.
/// It is dropped, and any text after the marker, typically a clause type
/// such as `_decl`, moves onto the next element that survives.
pub fn clean_path(path: &str) -> Result<String, DependencyError> {
    if memchr::memchr(SET_MARKER, path.as_bytes()).is_none() {
        return Ok(path.to_string());
    }

    let mut cleaned: Vec<String> = Vec::new();
    let mut carried = String::new();
    let mut last_marker = "";
    for element in path.split_whitespace() {
        match element.strip_prefix(SET_MARKER as char) {
            Some(tail) => {
                carried.push_str(tail);
                last_marker = element;
            }
            None => {
                cleaned.push(format!("{element}{carried}"));
                carried.clear();
            }
        }
    }

    if !carried.is_empty() {
        return Err(DependencyError::DanglingMarker {
            token: last_marker.to_string(),
        });
    }
    debug!(path, cleaned = ?cleaned, "cleaned path");
    Ok(cleaned.join(" "))
}
