//! Analysis settings

use std::fmt;
use std::str::FromStr;

use crate::locate::GrammaticalFunction;

/// Dependency type marked on the f-structure edge into the filler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyType {
    /// `TOPIC-REL`: relativization
    Relative,
    /// `FOCUS-INT`: wh-questions
    Interrogative,
    Custom(String),
}

impl DependencyType {
    pub fn label(&self) -> &str {
        match self {
            DependencyType::Relative => "TOPIC-REL",
            DependencyType::Interrogative => "FOCUS-INT",
            DependencyType::Custom(label) => label,
        }
    }
}

impl FromStr for DependencyType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "TOPIC-REL" => DependencyType::Relative,
            "FOCUS-INT" => DependencyType::Interrogative,
            other => DependencyType::Custom(other.to_string()),
        })
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Default bound on path ascent steps
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Settings for one analysis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// PRED values that can head a dependency
    pub eligible_values: Vec<String>,
    /// PRED values whose position defaults to ADJUNCT when no edge names it
    pub adjunct_values: Vec<String>,
    /// Edge labels accepted as the predicate's syntactic position
    pub position_labels: Vec<GrammaticalFunction>,
    pub dependency_type: DependencyType,
    /// Maximum number of ascent steps before the tracer gives up
    pub max_depth: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let adjunct_values: Vec<String> = ["hvor", "hvorfor", "hvordan", "når"]
            .into_iter()
            .map(String::from)
            .collect();
        let mut eligible_values = vec!["pro".to_string()];
        eligible_values.extend(adjunct_values.iter().cloned());
        Self {
            eligible_values,
            adjunct_values,
            position_labels: GrammaticalFunction::ALL.to_vec(),
            dependency_type: DependencyType::Relative,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl AnalysisConfig {
    pub fn with_dependency_type(mut self, dependency_type: DependencyType) -> Self {
        self.dependency_type = dependency_type;
        self
    }

    pub fn with_eligible_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.eligible_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_adjunct_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.adjunct_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_position_labels<I>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = GrammaticalFunction>,
    {
        self.position_labels = labels.into_iter().collect();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.eligible_values, ["pro", "hvor", "hvorfor", "hvordan", "når"]);
        assert_eq!(config.adjunct_values, ["hvor", "hvorfor", "hvordan", "når"]);
        let labels: Vec<&str> = config.position_labels.iter().map(|gf| gf.as_str()).collect();
        assert_eq!(labels, ["SUBJ", "OBJ", "ADJUNCT", "PREDLINK", "OBL-TH"]);
        assert_eq!(config.dependency_type.label(), "TOPIC-REL");
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_dependency_type_parse() {
        assert_eq!("FOCUS-INT".parse(), Ok(DependencyType::Interrogative));
        assert_eq!("TOPIC-REL".parse(), Ok(DependencyType::Relative));
        assert_eq!(
            "TOPIC".parse(),
            Ok(DependencyType::Custom("TOPIC".to_string()))
        );
    }

    #[test]
    fn test_builders() {
        let config = AnalysisConfig::default()
            .with_dependency_type(DependencyType::Interrogative)
            .with_eligible_values(["hva"])
            .with_max_depth(3);
        assert_eq!(config.eligible_values, ["hva"]);
        assert_eq!(config.dependency_type, DependencyType::Interrogative);
        assert_eq!(config.max_depth, 3);
    }
}
