//! Locating dependencies in the f-structure
//!
//! Three scans over the functional layer: PRED terminals with an eligible
//! value, dependency edges (e.g. `TOPIC-REL`) pointing at those levels,
//! and the grammatical function under which a level is embedded.

use crate::config::AnalysisConfig;
use crate::error::DependencyError;
use crate::fstructure::FStructure;
use crate::ids::last_segment;
use crate::path::FirstStep;
use memchr::memmem;
use std::fmt;
use std::str::FromStr;

/// A PRED terminal with an eligible value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateOccurrence {
    /// Level number the PRED belongs to, e.g. `7` for `s1_f_7_PRED`
    pub level: String,
    pub value: String,
}

/// Level segment of a PRED terminal id (`..._<LEVEL>_PRED`)
pub fn pred_level(id: &str) -> Option<&str> {
    let bytes = id.as_bytes();
    let finder = memmem::Finder::new(b"_PRED");
    for sep in memchr::memrchr_iter(b'_', bytes) {
        let start = sep + 2;
        if let Some(offset) = bytes.get(start..).and_then(|rest| finder.find(rest)) {
            return Some(&id[sep + 1..start + offset]);
        }
    }
    None
}

/// Find PRED terminals whose value is eligible, in document order
///
/// Terminals whose id does not follow the `_<LEVEL>_PRED` pattern are skipped.
pub fn find_predicates(fs: &FStructure<'_>, eligible_values: &[String]) -> Vec<PredicateOccurrence> {
    fs.terminals()
        .iter()
        .filter_map(|t| {
            let value = t.val.as_deref()?;
            if !eligible_values.iter().any(|v| v == value) {
                return None;
            }
            let level = pred_level(&t.id)?;
            Some(PredicateOccurrence {
                level: level.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

/// One dependency of the target type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyCandidate {
    /// Edge target: the f-structure level of the predicate
    pub target: String,
    pub pred_value: String,
    /// Level that embeds the filler; the path is cut here
    pub truncation_point: String,
}

/// Result of the dependency edge scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeMatches {
    /// Matched edge target -> predicate value, in first-seen order.
    /// A later match on the same target overwrites the value.
    pub targets: Vec<(String, String)>,
    /// Owning non-terminal of every match, in scan order
    pub truncation_points: Vec<String>,
}

impl EdgeMatches {
    /// Number of distinct matched targets
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    fn insert(&mut self, target: &str, value: &str) {
        match self.targets.iter_mut().find(|(t, _)| t == target) {
            Some((_, v)) => *v = value.to_string(),
            None => self.targets.push((target.to_string(), value.to_string())),
        }
    }

    /// The dependency, if exactly one target matched
    pub fn single(&self) -> Option<DependencyCandidate> {
        let [(target, pred_value)] = self.targets.as_slice() else {
            return None;
        };
        Some(DependencyCandidate {
            target: target.clone(),
            pred_value: pred_value.clone(),
            truncation_point: self.truncation_points.first()?.clone(),
        })
    }
}

/// Find edges labelled `dependency_type` that point at a located predicate level
pub fn find_edges(
    fs: &FStructure<'_>,
    predicates: &[PredicateOccurrence],
    dependency_type: &str,
) -> EdgeMatches {
    let mut matches = EdgeMatches::default();
    for edge in fs.edges_with_label(dependency_type) {
        let target_level = last_segment(edge.target);
        for pred in predicates.iter().filter(|p| p.level == target_level) {
            matches.truncation_points.push(edge.owner.to_string());
            matches.insert(edge.target, &pred.value);
        }
    }
    matches
}

/// Grammatical functions a predicate position can resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammaticalFunction {
    Subj,
    Obj,
    Adjunct,
    PredLink,
    OblTh,
}

impl GrammaticalFunction {
    pub const ALL: [GrammaticalFunction; 5] = [
        GrammaticalFunction::Subj,
        GrammaticalFunction::Obj,
        GrammaticalFunction::Adjunct,
        GrammaticalFunction::PredLink,
        GrammaticalFunction::OblTh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GrammaticalFunction::Subj => "SUBJ",
            GrammaticalFunction::Obj => "OBJ",
            GrammaticalFunction::Adjunct => "ADJUNCT",
            GrammaticalFunction::PredLink => "PREDLINK",
            GrammaticalFunction::OblTh => "OBL-TH",
        }
    }
}

impl FromStr for GrammaticalFunction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|gf| gf.as_str() == s).ok_or(())
    }
}

impl fmt::Display for GrammaticalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Syntactic position of the predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Found on an edge pointing at the predicate's level
    Resolved(GrammaticalFunction),
    /// No edge found, but the predicate is an adverbial wh-word
    AdjunctFallback,
}

impl Position {
    pub fn label(&self) -> &'static str {
        match self {
            Position::Resolved(gf) => gf.as_str(),
            Position::AdjunctFallback => GrammaticalFunction::Adjunct.as_str(),
        }
    }

    /// Which edge the path tracer may follow out of the predicate's level
    ///
    /// A resolved position follows its own function. The fallback has no
    /// such edge, so it takes the first edge that is not the dependency
    /// edge itself.
    pub fn first_step<'a>(&self, dependency_label: &'a str) -> FirstStep<'a> {
        match self {
            Position::Resolved(gf) => FirstStep::Labelled(gf.as_str()),
            Position::AdjunctFallback => FirstStep::Except(dependency_label),
        }
    }
}

/// Resolve the grammatical function of `level`
///
/// Every edge into `level` is checked; the last one whose label is among
/// the configured position labels wins.
pub fn find_syntactic_position(
    fs: &FStructure<'_>,
    level: &str,
    pred_value: &str,
    config: &AnalysisConfig,
) -> Result<Position, DependencyError> {
    let found = fs
        .edges_to(level)
        .filter_map(|e| position_function(e.label, &config.position_labels))
        .last();
    match found {
        Some(gf) => Ok(Position::Resolved(gf)),
        None if config.adjunct_values.iter().any(|v| v == pred_value) => {
            Ok(Position::AdjunctFallback)
        }
        None => Err(DependencyError::PositionNotFound {
            level: level.to_string(),
            pred_value: pred_value.to_string(),
        }),
    }
}

/// Labels of edges into `level` that are not position labels
pub fn failing_labels(
    fs: &FStructure<'_>,
    level: &str,
    position_labels: &[GrammaticalFunction],
) -> Vec<String> {
    fs.edges_to(level)
        .filter(|e| position_function(e.label, position_labels).is_none())
        .map(|e| e.label.to_string())
        .collect()
}

fn position_function(label: &str, allowed: &[GrammaticalFunction]) -> Option<GrammaticalFunction> {
    label
        .parse::<GrammaticalFunction>()
        .ok()
        .filter(|gf| allowed.contains(gf))
}
