use serde::{Deserialize, Serialize};

/// What the pipeline was searching: one model against a sequence database, or
/// one sequence against a model database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    /// Query model(s) against target sequences
    #[default]
    Search,
    /// Query sequence(s) against target models
    Scan,
}

impl PipelineMode {
    /// Label for the target column of the hit table
    pub fn target_label(self) -> &'static str {
        match self {
            Self::Search => "sequence",
            Self::Scan => "model",
        }
    }
}

impl std::fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Search => write!(f, "SEARCH"),
            Self::Scan => write!(f, "SCAN"),
        }
    }
}

/// Where the REPORTED/INCLUDED flags of a hit list come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdProvenance {
    /// Flags are derived here from the policy's score/E-value predicates
    PolicyDerived,
    /// Flags were stamped during the scan from per-model bit score cutoffs
    PreApplied,
}

/// A raw hit from the upstream scanner: location and score only
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SearchResultNode {
    pub start: i64,
    pub stop: i64,
    pub bestr: i32,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_mode_labels() {
        assert_eq!(PipelineMode::Search.to_string(), "SEARCH");
        assert_eq!(PipelineMode::Scan.to_string(), "SCAN");
        assert_eq!(PipelineMode::Search.target_label(), "sequence");
        assert_eq!(PipelineMode::Scan.target_label(), "model");
    }
}
