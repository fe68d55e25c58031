//! Per-bookmark derived data, computed once per analysis run

use std::collections::{BTreeSet, HashSet};

use crate::classifier::TopicClassifier;
use crate::keywords::{tokenize, KeywordExtractor};
use crate::types::{Bookmark, Keyword};

/// Tokens, keywords and topics of one bookmark.
///
/// Built once and then shared by reference with clustering, graph
/// building and summary computation.
#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkProfile<'a> {
    pub bookmark: &'a Bookmark,
    pub tokens: Vec<String>,
    pub keywords: Vec<Keyword>,
    pub topics: BTreeSet<String>,
}

impl<'a> BookmarkProfile<'a> {
    pub fn build(
        bookmark: &'a Bookmark,
        extractor: &KeywordExtractor,
        classifier: &TopicClassifier,
        max_keywords: usize,
    ) -> Self {
        let tokens = tokenize(&bookmark.text);
        let keywords = extractor.extract_from_tokens(&tokens, max_keywords);
        let topics = classifier.classify_tokens(&tokens);
        Self {
            bookmark,
            tokens,
            keywords,
            topics,
        }
    }

    pub fn id(&self) -> &str {
        &self.bookmark.id
    }

    pub fn keyword_set(&self) -> HashSet<&str> {
        self.keywords.iter().map(|k| k.term.as_str()).collect()
    }

    pub fn is_unclassified(&self) -> bool {
        self.topics.is_empty()
    }
}

/// Profile every bookmark, preserving input order
pub fn build_profiles<'a>(
    bookmarks: &'a [Bookmark],
    extractor: &KeywordExtractor,
    classifier: &TopicClassifier,
    max_keywords: usize,
) -> Vec<BookmarkProfile<'a>> {
    bookmarks
        .iter()
        .map(|b| BookmarkProfile::build(b, extractor, classifier, max_keywords))
        .collect()
}
