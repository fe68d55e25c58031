//! Collection statistics over raw records

use chrono::{DateTime, Utc};
use marginalia_core::BookmarkRecord;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorTally {
    pub author: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub total_records: usize,
    /// Records carrying a usable id, counted once per id
    pub unique_ids: usize,
    /// Entries that could not be read as records
    pub unreadable: usize,
    pub unique_authors: usize,
    pub top_authors: Vec<AuthorTally>,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
    pub total_likes: u64,
    pub total_reposts: u64,
    pub total_replies: u64,
    pub threads: usize,
}

impl CollectionStats {
    pub fn compute(records: &[BookmarkRecord], top_n: usize) -> Self {
        let mut stats = CollectionStats {
            total_records: records.len(),
            ..Default::default()
        };
        let mut authors: HashMap<String, usize> = HashMap::new();
        let mut ids: HashSet<&str> = HashSet::new();

        for record in records {
            if let Some(id) = record.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
                ids.insert(id);
            }
            if record.is_unreadable() {
                stats.unreadable += 1;
                continue;
            }

            if let Some(author) = record
                .author
                .as_deref()
                .map(|a| a.trim().trim_start_matches('@'))
                .filter(|a| !a.is_empty())
            {
                *authors.entry(author.to_string()).or_insert(0) += 1;
            }

            if let Some(ts) = record
                .created_at
                .as_deref()
                .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
                .map(|ts| ts.with_timezone(&Utc))
            {
                stats.earliest = Some(stats.earliest.map_or(ts, |e| e.min(ts)));
                stats.latest = Some(stats.latest.map_or(ts, |l| l.max(ts)));
            }

            stats.total_likes = stats.total_likes.saturating_add(record.engagement.likes);
            stats.total_reposts = stats.total_reposts.saturating_add(record.engagement.reposts);
            stats.total_replies = stats.total_replies.saturating_add(record.engagement.replies);
            if record.is_thread {
                stats.threads += 1;
            }
        }

        stats.unique_ids = ids.len();
        stats.unique_authors = authors.len();
        let mut top: Vec<AuthorTally> = authors
            .into_iter()
            .map(|(author, count)| AuthorTally { author, count })
            .collect();
        top.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.author.cmp(&b.author)));
        top.truncate(top_n);
        stats.top_authors = top;
        stats
    }
}
