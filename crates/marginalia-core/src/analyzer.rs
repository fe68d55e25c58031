//! Validate, profile, cluster and graph a bookmark collection in one pass

use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument, warn};

use crate::classifier::TopicClassifier;
use crate::cluster::cluster_profiles;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::graph::GraphBuilder;
use crate::keywords::{merge_keywords, KeywordExtractor};
use crate::profile::build_profiles;
use crate::report::{AnalysisReport, AuthorCount, SkipReason, SkippedRecord, Summary};
use crate::taxonomy::Taxonomy;
use crate::types::{Bookmark, BookmarkRecord};

/// Convert records to bookmarks, dropping malformed ones and repeated ids
pub fn validate_records(records: &[BookmarkRecord]) -> (Vec<Bookmark>, Vec<SkippedRecord>) {
    let mut bookmarks = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (index, record) in records.iter().enumerate() {
        let reason = match Bookmark::try_from(record) {
            Ok(bookmark) if seen.insert(bookmark.id.clone()) => {
                bookmarks.push(bookmark);
                continue;
            }
            Ok(_) => SkipReason::DuplicateId,
            Err(e) => SkipReason::Malformed(e),
        };
        warn!(index, id = ?record.id, %reason, "skipping bookmark record");
        skipped.push(SkippedRecord {
            index,
            id: record.id.clone(),
            reason,
        });
    }

    (bookmarks, skipped)
}

/// Runs the full analysis with a fixed configuration and taxonomy
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    taxonomy: Taxonomy,
    extractor: KeywordExtractor,
    classifier: TopicClassifier,
    graph_builder: GraphBuilder,
}

impl Analyzer {
    /// Fails on parameters outside their contract, before any data is seen
    pub fn new(config: AnalysisConfig, taxonomy: Taxonomy) -> Result<Self> {
        config.validate()?;
        let graph_builder = GraphBuilder::from_config(&config)?;
        if taxonomy.is_empty() {
            warn!("taxonomy has no topics, every bookmark will be unclassified");
        }
        Ok(Self {
            extractor: KeywordExtractor::from_config(&config),
            classifier: TopicClassifier::new(&taxonomy),
            graph_builder,
            config,
            taxonomy,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    #[instrument(skip_all, fields(records = records.len()))]
    pub fn analyze(&self, records: &[BookmarkRecord]) -> AnalysisReport {
        let (bookmarks, skipped) = validate_records(records);
        self.analyze_validated(bookmarks, skipped)
    }

    /// Analyze bookmarks that are already validated; repeated ids are still dropped
    pub fn analyze_bookmarks(&self, bookmarks: Vec<Bookmark>) -> AnalysisReport {
        let mut seen: HashSet<String> = HashSet::new();
        let mut unique = Vec::with_capacity(bookmarks.len());
        let mut skipped = Vec::new();
        for (index, bookmark) in bookmarks.into_iter().enumerate() {
            if seen.insert(bookmark.id.clone()) {
                unique.push(bookmark);
            } else {
                warn!(index, id = %bookmark.id, "skipping duplicate bookmark");
                skipped.push(SkippedRecord {
                    index,
                    id: Some(bookmark.id),
                    reason: SkipReason::DuplicateId,
                });
            }
        }
        self.analyze_validated(unique, skipped)
    }

    fn analyze_validated(
        &self,
        bookmarks: Vec<Bookmark>,
        skipped: Vec<SkippedRecord>,
    ) -> AnalysisReport {
        let (clustering, graph, top_keywords) = {
            let profiles = build_profiles(
                &bookmarks,
                &self.extractor,
                &self.classifier,
                self.config.max_keywords,
            );
            let clustering = cluster_profiles(&profiles);
            let graph = self.graph_builder.build(&profiles, &clustering, &self.taxonomy);
            let mut top_keywords = merge_keywords(profiles.iter().flat_map(|p| p.keywords.iter()));
            top_keywords.truncate(self.config.top_keywords);
            (clustering, graph, top_keywords)
        };

        let summary = Summary {
            total_bookmarks: bookmarks.len(),
            skipped_records: skipped.len(),
            unclassified_count: clustering.unclassified.len(),
            topic_counts: clustering.topic_counts(),
            top_keywords,
            top_authors: top_authors(&bookmarks, self.config.top_authors),
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            component_count: graph.components(),
        };

        info!(
            bookmarks = summary.total_bookmarks,
            skipped = summary.skipped_records,
            topics = summary.topic_counts.len(),
            unclassified = summary.unclassified_count,
            edges = summary.edge_count,
            "analysis complete"
        );
        debug!(components = summary.component_count, "graph components");

        AnalysisReport {
            bookmarks,
            clusters: clustering.clusters,
            unclassified: clustering.unclassified,
            topic_assignments: clustering.assignments,
            graph,
            summary,
            skipped,
        }
    }
}

/// Authors by bookmark count desc, then handle; unknown authors are not counted
pub fn top_authors(bookmarks: &[Bookmark], limit: usize) -> Vec<AuthorCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for bookmark in bookmarks.iter().filter(|b| !b.author.is_empty()) {
        *counts.entry(bookmark.author.as_str()).or_insert(0) += 1;
    }
    let mut authors: Vec<AuthorCount> = counts
        .into_iter()
        .map(|(author, count)| AuthorCount {
            author: author.to_string(),
            count,
        })
        .collect();
    authors.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.author.cmp(&b.author)));
    authors.truncate(limit);
    authors
}

/// One-shot analysis with default settings apart from the threshold
pub fn analyze(
    records: &[BookmarkRecord],
    taxonomy: &Taxonomy,
    min_similarity: f64,
) -> Result<AnalysisReport> {
    let config = AnalysisConfig {
        min_similarity,
        ..AnalysisConfig::new()
    };
    Ok(Analyzer::new(config, taxonomy.clone())?.analyze(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphGranularity;
    use crate::error::{AnalysisError, MalformedRecord};

    fn record(id: &str, author: &str, text: &str) -> BookmarkRecord {
        BookmarkRecord {
            id: Some(id.to_string()),
            author: Some(author.to_string()),
            text: Some(text.to_string()),
            created_at: Some("2024-05-01T10:00:00Z".to_string()),
            ..Default::default()
        }
    }

    fn taxonomy() -> Taxonomy {
        Taxonomy::new()
            .with_topic("AI/ML", ["machine learning", "transformers"])
            .with_topic("Programming", ["python", "tutorial"])
    }

    fn records() -> Vec<BookmarkRecord> {
        vec![
            record("1", "alice", "machine learning transformers"),
            record("2", "bob", "Python programming tutorial"),
            record("3", "alice", "machine learning python libraries"),
        ]
    }

    #[test]
    fn test_reference_scenario() {
        let report = analyze(&records(), &taxonomy(), 0.1).unwrap();
        assert_eq!(report.summary.total_bookmarks, 3);
        assert_eq!(report.cluster("AI/ML").unwrap().bookmark_ids, vec!["1", "3"]);
        assert_eq!(
            report.cluster("Programming").unwrap().bookmark_ids,
            vec!["2", "3"]
        );
        assert_eq!(report.topics_for("3").unwrap().len(), 2);
        assert!(report.graph.weight("1", "3").is_some());
        assert!(report.graph.weight("2", "3").is_some());
        assert!(report.graph.weight("1", "2").is_none());
        assert_eq!(report.summary.edge_count, 2);
        assert_eq!(report.summary.component_count, 1);
    }

    #[test]
    fn test_empty_input() {
        let report = analyze(&[], &taxonomy(), 0.2).unwrap();
        assert!(report.is_empty());
        assert!(report.clusters.is_empty());
        assert_eq!(report.summary, Summary::default());
        assert!(report.graph.is_empty());
    }

    #[test]
    fn test_malformed_record_skipped() {
        let mut input = records();
        input.push(BookmarkRecord {
            id: Some("4".to_string()),
            text: None,
            created_at: Some("2024-05-01T10:00:00Z".to_string()),
            ..Default::default()
        });
        let report = analyze(&input, &taxonomy(), 0.1).unwrap();
        assert_eq!(report.summary.total_bookmarks, 3);
        assert_eq!(report.summary.skipped_records, 1);
        assert_eq!(report.skipped[0].index, 3);
        assert_eq!(
            report.skipped[0].reason,
            SkipReason::Malformed(MalformedRecord::MissingText)
        );
    }

    #[test]
    fn test_unreadable_record_counted_as_skipped() {
        let mut input = records();
        input.push(BookmarkRecord::unreadable(
            serde_json::json!({"id": "5", "like_count": -1}),
            "invalid value: integer `-1`",
        ));
        let report = analyze(&input, &taxonomy(), 0.1).unwrap();
        assert_eq!(report.summary.total_bookmarks, 3);
        assert_eq!(report.summary.skipped_records, 1);
        assert_eq!(report.skipped[0].id.as_deref(), Some("5"));
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::Malformed(MalformedRecord::Unreadable(_))
        ));
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut input = records();
        input.push(record("1", "mallory", "completely different text"));
        let report = analyze(&input, &taxonomy(), 0.1).unwrap();
        assert_eq!(report.summary.total_bookmarks, 3);
        assert_eq!(report.skipped[0].reason, SkipReason::DuplicateId);
        assert_eq!(report.bookmark("1").unwrap().author, "alice");
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        assert!(matches!(
            analyze(&records(), &taxonomy(), 2.0),
            Err(AnalysisError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_idempotent() {
        let analyzer = Analyzer::new(AnalysisConfig::new(), taxonomy()).unwrap();
        assert_eq!(analyzer.analyze(&records()), analyzer.analyze(&records()));
    }

    #[test]
    fn test_summary_tables() {
        let report = analyze(&records(), &taxonomy(), 0.1).unwrap();
        assert_eq!(
            report.summary.top_authors[0],
            AuthorCount {
                author: "alice".to_string(),
                count: 2
            }
        );
        assert_eq!(report.summary.top_keywords[0].term, "learning");
        assert_eq!(report.summary.topic_counts["AI/ML"], 2);
    }

    #[test]
    fn test_empty_taxonomy_degrades() {
        let report = analyze(&records(), &Taxonomy::new(), 0.1).unwrap();
        assert!(report.clusters.is_empty());
        assert_eq!(report.unclassified, vec!["1", "2", "3"]);
        assert_eq!(report.unclassified_bookmarks().len(), 3);
    }

    #[test]
    fn test_topic_granularity_config() {
        let config = AnalysisConfig {
            granularity: GraphGranularity::Topic,
            min_similarity: 0.1,
            ..AnalysisConfig::new()
        };
        let report = Analyzer::new(config, taxonomy())
            .unwrap()
            .analyze(&records());
        assert_eq!(report.graph.node_count(), 2);
        assert_eq!(report.summary.edge_count, 1);
    }

    #[test]
    fn test_analyze_bookmarks_drops_duplicates() {
        let (bookmarks, _) = validate_records(&records());
        let mut doubled = bookmarks.clone();
        doubled.extend(bookmarks);
        let analyzer = Analyzer::new(AnalysisConfig::new(), taxonomy()).unwrap();
        let report = analyzer.analyze_bookmarks(doubled);
        assert_eq!(report.summary.total_bookmarks, 3);
        assert_eq!(report.summary.skipped_records, 3);
    }

    #[test]
    fn test_top_authors_ordering() {
        let (bookmarks, _) = validate_records(&[
            record("1", "zed", "a"),
            record("2", "amy", "b"),
            record("3", "", "c"),
        ]);
        let authors = top_authors(&bookmarks, 10);
        let names: Vec<_> = authors.iter().map(|a| a.author.as_str()).collect();
        assert_eq!(names, vec!["amy", "zed"]);
        assert_eq!(top_authors(&bookmarks, 1).len(), 1);
    }
}
