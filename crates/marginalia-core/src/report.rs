//! Analysis report returned by the orchestrator

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::cluster::TopicCluster;
use crate::error::MalformedRecord;
use crate::graph::RelationshipGraph;
use crate::types::{Bookmark, Keyword};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Malformed(MalformedRecord),
    /// Same id as an earlier record; the first one is kept
    DuplicateId,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Malformed(reason) => write!(f, "{reason}"),
            SkipReason::DuplicateId => write!(f, "duplicate id"),
        }
    }
}

/// An input record left out of the analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Position in the input slice
    pub index: usize,
    pub id: Option<String>,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorCount {
    pub author: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_bookmarks: usize,
    pub skipped_records: usize,
    pub unclassified_count: usize,
    pub topic_counts: BTreeMap<String, usize>,
    pub top_keywords: Vec<Keyword>,
    pub top_authors: Vec<AuthorCount>,
    pub node_count: usize,
    pub edge_count: usize,
    pub component_count: usize,
}

/// Everything one analysis run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Validated bookmarks in input order
    pub bookmarks: Vec<Bookmark>,
    pub clusters: BTreeMap<String, TopicCluster>,
    pub unclassified: Vec<String>,
    pub topic_assignments: BTreeMap<String, BTreeSet<String>>,
    pub graph: RelationshipGraph,
    pub summary: Summary,
    pub skipped: Vec<SkippedRecord>,
}

impl AnalysisReport {
    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    pub fn bookmark(&self, id: &str) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == id)
    }

    pub fn cluster(&self, topic: &str) -> Option<&TopicCluster> {
        self.clusters.get(topic)
    }

    pub fn topics_for(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.topic_assignments.get(id)
    }

    /// Members of `topic` in input order; empty for an unknown topic
    pub fn bookmarks_for_topic(&self, topic: &str) -> Vec<&Bookmark> {
        let Some(cluster) = self.clusters.get(topic) else {
            return Vec::new();
        };
        let members: BTreeSet<&str> = cluster.bookmark_ids.iter().map(String::as_str).collect();
        self.bookmarks
            .iter()
            .filter(|b| members.contains(b.id.as_str()))
            .collect()
    }

    pub fn unclassified_bookmarks(&self) -> Vec<&Bookmark> {
        let ids: BTreeSet<&str> = self.unclassified.iter().map(String::as_str).collect();
        self.bookmarks
            .iter()
            .filter(|b| ids.contains(b.id.as_str()))
            .collect()
    }

    /// Clusters by member count desc, then topic name
    pub fn topics_by_size(&self) -> Vec<&TopicCluster> {
        let mut clusters: Vec<_> = self.clusters.values().collect();
        clusters.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.topic.cmp(&b.topic)));
        clusters
    }
}
