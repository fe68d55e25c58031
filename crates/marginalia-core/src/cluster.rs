//! Group bookmarks by topic

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::classifier::TopicClassifier;
use crate::config::AnalysisConfig;
use crate::keywords::{merge_keywords, KeywordExtractor};
use crate::profile::{build_profiles, BookmarkProfile};
use crate::taxonomy::Taxonomy;
use crate::types::{Bookmark, Keyword};

/// Bookmarks sharing one topic, with their combined keyword table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCluster {
    pub topic: String,
    /// Member ids in input order
    pub bookmark_ids: Vec<String>,
    /// Summed member keywords, frequency desc then term asc
    pub keywords: Vec<Keyword>,
}

impl TopicCluster {
    pub fn len(&self) -> usize {
        self.bookmark_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmark_ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.bookmark_ids.iter().any(|member| member == id)
    }

    pub fn top_keywords(&self, n: usize) -> &[Keyword] {
        &self.keywords[..n.min(self.keywords.len())]
    }
}

/// Result of grouping a collection by topic.
///
/// A bookmark may sit in several clusters. Topics without members are
/// absent from `clusters`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clustering {
    pub clusters: BTreeMap<String, TopicCluster>,
    /// Ids that matched no topic, in input order
    pub unclassified: Vec<String>,
    /// Topic set of every bookmark, empty for unclassified ones
    pub assignments: BTreeMap<String, BTreeSet<String>>,
}

impl Clustering {
    pub fn unclassified(&self) -> &[String] {
        &self.unclassified
    }

    pub fn topic_counts(&self) -> BTreeMap<String, usize> {
        self.clusters
            .iter()
            .map(|(topic, cluster)| (topic.clone(), cluster.len()))
            .collect()
    }
}

/// Group already profiled bookmarks
pub fn cluster_profiles(profiles: &[BookmarkProfile]) -> Clustering {
    let mut members: BTreeMap<&str, Vec<&BookmarkProfile>> = BTreeMap::new();
    let mut clustering = Clustering::default();

    for profile in profiles {
        clustering
            .assignments
            .insert(profile.id().to_string(), profile.topics.clone());
        if profile.is_unclassified() {
            clustering.unclassified.push(profile.id().to_string());
            continue;
        }
        for topic in &profile.topics {
            members.entry(topic.as_str()).or_default().push(profile);
        }
    }

    for (topic, group) in members {
        let keywords = merge_keywords(group.iter().flat_map(|p| p.keywords.iter()));
        let cluster = TopicCluster {
            topic: topic.to_string(),
            bookmark_ids: group.iter().map(|p| p.id().to_string()).collect(),
            keywords,
        };
        debug!(topic, members = cluster.len(), "built topic cluster");
        clustering.clusters.insert(topic.to_string(), cluster);
    }

    clustering
}

/// Classify and group `bookmarks` with the default extractor settings
pub fn cluster(bookmarks: &[Bookmark], taxonomy: &Taxonomy) -> Clustering {
    let config = AnalysisConfig::new();
    let classifier = TopicClassifier::new(taxonomy);
    let extractor = KeywordExtractor::from_config(&config);
    let profiles = build_profiles(bookmarks, &extractor, &classifier, config.max_keywords);
    cluster_profiles(&profiles)
}
