//! Multi-label topic classification by trigger phrase matching

use std::collections::BTreeSet;
use tracing::warn;

use crate::keywords::tokenize;
use crate::taxonomy::Taxonomy;
use crate::types::Bookmark;

#[derive(Debug, Clone)]
struct Trigger {
    phrase: String,
    tokens: Vec<String>,
    /// `tokens` with hyphenated compounds split into their parts
    parts: Vec<String>,
}

impl Trigger {
    fn matches(&self, tokens: &[String], parts: &[String]) -> bool {
        contains_sequence(tokens, &self.tokens) || contains_sequence(parts, &self.parts)
    }
}

#[derive(Debug, Clone)]
struct CompiledTopic {
    name: String,
    triggers: Vec<Trigger>,
}

/// Assigns topics to bookmarks from a [`Taxonomy`].
///
/// A trigger matches when its tokens occur contiguously, as whole tokens,
/// in the bookmark's token stream. Matching is case-insensitive because
/// both sides go through [`tokenize`]. Hyphenated compounds also match as
/// their parts, so `machine-learning` matches `machine learning` and
/// `open source` matches `open-source`.
#[derive(Debug, Clone)]
pub struct TopicClassifier {
    topics: Vec<CompiledTopic>,
}

impl TopicClassifier {
    pub fn new(taxonomy: &Taxonomy) -> Self {
        let topics = taxonomy
            .topics()
            .map(|(name, definition)| {
                let triggers = definition
                    .triggers
                    .iter()
                    .filter_map(|phrase| {
                        let tokens = tokenize(phrase);
                        if tokens.is_empty() {
                            warn!(topic = name, trigger = %phrase, "trigger has no matchable tokens, ignoring");
                            None
                        } else {
                            Some(Trigger {
                                phrase: phrase.clone(),
                                parts: split_compounds(&tokens),
                                tokens,
                            })
                        }
                    })
                    .collect::<Vec<_>>();
                if triggers.is_empty() {
                    warn!(topic = name, "topic has no usable triggers and will never match");
                }
                CompiledTopic {
                    name: name.to_string(),
                    triggers,
                }
            })
            .collect();

        Self { topics }
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn classify(&self, bookmark: &Bookmark) -> BTreeSet<String> {
        self.classify_tokens(&tokenize(&bookmark.text))
    }

    pub fn classify_tokens(&self, tokens: &[String]) -> BTreeSet<String> {
        let parts = split_compounds(tokens);
        self.topics
            .iter()
            .filter(|topic| topic.triggers.iter().any(|t| t.matches(tokens, &parts)))
            .map(|topic| topic.name.clone())
            .collect()
    }

    /// Trigger phrases of `topic` found in `tokens`
    pub fn matched_triggers(&self, tokens: &[String], topic: &str) -> Vec<&str> {
        let parts = split_compounds(tokens);
        self.topics
            .iter()
            .filter(|t| t.name == topic)
            .flat_map(|t| t.triggers.iter())
            .filter(|t| t.matches(tokens, &parts))
            .map(|t| t.phrase.as_str())
            .collect()
    }
}

fn split_compounds(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .flat_map(|token| token.split(['-', '_']))
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn contains_sequence(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}

/// Classify one bookmark against `taxonomy`
pub fn classify(bookmark: &Bookmark, taxonomy: &Taxonomy) -> BTreeSet<String> {
    TopicClassifier::new(taxonomy).classify(bookmark)
}
