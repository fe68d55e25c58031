//! Error types for bookmark analysis

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used throughout the analysis engine.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that reject an analysis call outright.
///
/// Data-shape problems (bad records, empty taxonomy) never surface here;
/// they degrade the report instead.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A caller-supplied parameter is outside its contract
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    /// Taxonomy JSON could not be parsed
    #[error("Invalid taxonomy: {0}")]
    InvalidTaxonomy(#[from] serde_json::Error),

    /// A topic was requested that has no cluster in the report
    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    /// A prompt needs bookmarks from topics that have none
    #[error("No bookmarks in topics: {}", .0.join(", "))]
    NoBookmarks(Vec<String>),
}

impl AnalysisError {
    pub(crate) fn invalid(name: &'static str, value: impl ToString, reason: &'static str) -> Self {
        AnalysisError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

/// Why a boundary record could not become a [`crate::Bookmark`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRecord {
    #[error("record has no id")]
    MissingId,

    #[error("record has no text field")]
    MissingText,

    #[error("record has no creation timestamp")]
    MissingTimestamp,

    #[error("unparseable timestamp: {0}")]
    InvalidTimestamp(String),

    /// The entry itself could not be read, e.g. a field of the wrong type
    #[error("unreadable record: {0}")]
    Unreadable(String),
}
