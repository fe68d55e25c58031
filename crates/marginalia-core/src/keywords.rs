//! Keyword extraction from bookmark text

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::config::AnalysisConfig;
use crate::types::Keyword;

/// Shortest token that can ever count as a keyword
pub const MIN_TOKEN_LENGTH: usize = 3;

static URL_RE: OnceLock<Regex> = OnceLock::new();
static MENTION_RE: OnceLock<Regex> = OnceLock::new();
static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

static STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "was", "were", "been", "being", "have", "has", "had", "does",
    "did", "will", "would", "could", "should", "may", "might", "can", "not", "but", "from",
    "with", "into", "through", "then", "than", "here", "there", "when", "where", "why", "how",
    "all", "each", "every", "both", "few", "more", "most", "some", "such", "only", "just",
    "about", "what", "which", "who", "whom", "this", "that", "these", "those", "its", "it's",
    "our", "you", "your", "yours", "they", "them", "their", "his", "her", "she", "him", "out",
    "off", "over", "under", "again", "very", "too", "also", "any", "own", "same", "other",
    "once", "because", "until", "while", "during", "before", "after", "above", "below",
    "between", "get", "got", "gets", "make", "made", "know", "see", "look", "like", "want",
    "need", "think", "take", "say", "said", "one", "two", "now", "still", "really", "much",
    "many", "even", "well", "way", "things", "thing", "lot", "new", "good", "great", "yes",
    "yeah", "thanks", "thank", "please", "lol", "lmao", "omg", "amp", "via", "https", "http",
    "www", "com", "don't", "doesn't", "didn't", "can't", "won't", "i'm", "you're", "we're",
    "that's", "here's", "there's", "let's", "isn't", "aren't", "wasn't", "i've", "you've",
    "today", "day", "time", "year", "years", "people", "everyone", "anyone", "someone",
];

/// Strip URLs and @mentions, lowercase, and split into word tokens.
///
/// Hashtag markers vanish with the other punctuation, so `#rustlang`
/// yields `rustlang`. No stop-word or length filtering happens here.
pub fn tokenize(text: &str) -> Vec<String> {
    let url_re =
        URL_RE.get_or_init(|| Regex::new(r"(?i)\b(?:https?://|www\.)\S+").expect("valid regex"));
    let mention_re = MENTION_RE.get_or_init(|| Regex::new(r"@\w+").expect("valid regex"));
    let token_re = TOKEN_RE.get_or_init(|| {
        Regex::new(r"[\p{L}\p{N}]+(?:['’_-][\p{L}\p{N}]+)*").expect("valid regex")
    });

    let without_urls = url_re.replace_all(text, " ");
    let cleaned = mention_re.replace_all(&without_urls, " ");
    token_re
        .find_iter(&cleaned.to_lowercase())
        .map(|m| m.as_str().replace('’', "'"))
        .collect()
}

/// Sum keyword tables and rank by frequency, then term
pub fn merge_keywords<'a, I>(keywords: I) -> Vec<Keyword>
where
    I: IntoIterator<Item = &'a Keyword>,
{
    let mut totals: HashMap<&str, usize> = HashMap::new();
    for keyword in keywords {
        *totals.entry(keyword.term.as_str()).or_insert(0) += keyword.frequency;
    }
    let mut merged: Vec<Keyword> = totals
        .into_iter()
        .map(|(term, frequency)| Keyword::new(term, frequency))
        .collect();
    merged.sort_by(|a, b| b.frequency.cmp(&a.frequency).then_with(|| a.term.cmp(&b.term)));
    merged
}

/// Frequency-based keyword extractor with a fixed stop-word set
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stop_words: HashSet<String>,
    min_token_length: usize,
}

impl KeywordExtractor {
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            min_token_length: MIN_TOKEN_LENGTH,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new()
            .with_min_token_length(config.min_token_length)
            .with_stop_words(&config.extra_stop_words)
    }

    pub fn with_min_token_length(mut self, min_token_length: usize) -> Self {
        self.min_token_length = min_token_length.max(MIN_TOKEN_LENGTH);
        self
    }

    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words
            .extend(words.into_iter().map(|w| w.as_ref().trim().to_lowercase()));
        self
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    fn qualifies(&self, token: &str) -> bool {
        token.chars().count() >= self.min_token_length
            && token.chars().any(char::is_alphabetic)
            && !self.is_stop_word(token)
    }

    /// Top `max_keywords` terms of `text` by frequency, ties in first-seen order
    pub fn extract(&self, text: &str, max_keywords: usize) -> Vec<Keyword> {
        if max_keywords == 0 {
            return Vec::new();
        }
        self.extract_from_tokens(&tokenize(text), max_keywords)
    }

    /// Same as [`extract`](Self::extract) over an already tokenized text
    pub fn extract_from_tokens(&self, tokens: &[String], max_keywords: usize) -> Vec<Keyword> {
        if max_keywords == 0 {
            return Vec::new();
        }

        let mut counts: Vec<(&str, usize)> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for token in tokens.iter().map(String::as_str) {
            if !self.qualifies(token) {
                continue;
            }
            match positions.get(token) {
                Some(&pos) => counts[pos].1 += 1,
                None => {
                    positions.insert(token, counts.len());
                    counts.push((token, 1));
                }
            }
        }

        // sort_by is stable, so equal counts keep first-occurrence order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .take(max_keywords)
            .map(|(term, frequency)| Keyword::new(term, frequency))
            .collect()
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract keywords with the built-in stop words
pub fn extract(text: &str, max_keywords: usize) -> Vec<Keyword> {
    KeywordExtractor::new().extract(text, max_keywords)
}
