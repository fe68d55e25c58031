//! Configuration for bookmark analysis

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::keywords::MIN_TOKEN_LENGTH;

/// What the nodes of the relationship graph stand for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphGranularity {
    /// One node per bookmark, weighted by keyword overlap
    #[default]
    Bookmark,
    /// One node per non-empty topic, weighted by shared members
    Topic,
}

/// Analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Keywords kept per bookmark
    pub max_keywords: usize,

    /// Edges need similarity strictly above this
    pub min_similarity: f64,

    /// Shortest token considered a keyword (never below 3)
    pub min_token_length: usize,

    /// Node granularity of the relationship graph
    pub granularity: GraphGranularity,

    /// Collection-wide keywords listed in the summary
    pub top_keywords: usize,

    /// Authors listed in the summary
    pub top_authors: usize,

    /// Additional stop words on top of the built-in list
    pub extra_stop_words: Vec<String>,
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self {
            max_keywords: 10,
            min_similarity: 0.2,
            min_token_length: MIN_TOKEN_LENGTH,
            granularity: GraphGranularity::Bookmark,
            top_keywords: 15,
            top_authors: 10,
            extra_stop_words: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            AnalysisError::invalid("config", e, "config JSON does not match the expected shape")
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameters that indicate caller error
    pub fn validate(&self) -> Result<()> {
        validate_min_similarity(self.min_similarity)?;
        if self.min_token_length < MIN_TOKEN_LENGTH {
            return Err(AnalysisError::invalid(
                "min_token_length",
                self.min_token_length,
                "must be at least 3",
            ));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn validate_min_similarity(value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(AnalysisError::invalid(
            "min_similarity",
            value,
            "must be within [0, 1]",
        ));
    }
    Ok(())
}
