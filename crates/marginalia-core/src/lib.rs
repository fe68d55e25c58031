//! Bookmark topic analysis: keywords, topics, clusters and a similarity graph

mod analyzer;
mod classifier;
mod cluster;
mod config;
mod error;
mod export;
mod graph;
mod keywords;
mod profile;
mod prompt;
mod report;
mod taxonomy;
mod types;

pub use analyzer::{analyze, top_authors, validate_records, Analyzer};
pub use classifier::{classify, TopicClassifier};
pub use cluster::{cluster, cluster_profiles, Clustering, TopicCluster};
pub use config::{AnalysisConfig, GraphGranularity};
pub use error::{AnalysisError, MalformedRecord, Result};
pub use export::{export, export_as, DiagramFormat, MAX_LABEL_CHARS};
pub use graph::{build_graph, jaccard, GraphBuilder, GraphEdge, GraphNode, RelationshipGraph};
pub use keywords::{extract, merge_keywords, tokenize, KeywordExtractor, MIN_TOKEN_LENGTH};
pub use profile::{build_profiles, BookmarkProfile};
pub use prompt::{
    estimate_tokens, PromptBuilder, DEFAULT_FOCUS, LEARNING_TOPICS, TOOL_TERMS, TOOL_TOPICS,
};
pub use report::{AnalysisReport, AuthorCount, SkipReason, SkippedRecord, Summary};
pub use taxonomy::{Taxonomy, TopicDefinition};
pub use types::{Bookmark, BookmarkRecord, Engagement, Keyword, Unreadable};
