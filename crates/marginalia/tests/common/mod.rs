#![allow(dead_code)]

use marginalia_core::{BookmarkRecord, Engagement, Taxonomy};

pub fn record(id: &str, author: &str, text: &str) -> BookmarkRecord {
    BookmarkRecord {
        id: Some(id.to_string()),
        author: Some(author.to_string()),
        text: Some(text.to_string()),
        created_at: Some("2024-05-01T10:00:00Z".to_string()),
        engagement: Engagement {
            likes: 3,
            reposts: 1,
            replies: 0,
        },
        ..Default::default()
    }
}

pub fn sample_taxonomy() -> Taxonomy {
    Taxonomy::new()
        .with_topic("AI/ML", ["machine learning", "transformers"])
        .with_topic("Programming", ["python", "tutorial"])
}

/// Three bookmarks: pure AI/ML, pure Programming, and one in both
pub fn sample_records() -> Vec<BookmarkRecord> {
    vec![
        record("1", "alice", "machine learning transformers"),
        record("2", "bob", "Python programming tutorial"),
        record("3", "carol", "machine learning python libraries"),
    ]
}

const SUBJECTS: &[&str] = &[
    "machine learning",
    "python tutorial",
    "startup fundraising",
    "design systems",
    "productivity habits",
    "rust compiler",
    "transformers paper",
    "typescript tooling",
];

const DETAILS: &[&str] = &[
    "benchmarks", "deployment", "notebook", "walkthrough", "interview", "checklist", "library",
    "workflow", "dataset", "thread",
];

/// Deterministic synthetic collection of `n` records
pub fn synthetic_records(n: usize) -> Vec<BookmarkRecord> {
    (0..n)
        .map(|i| {
            let subject = SUBJECTS[i % SUBJECTS.len()];
            let detail = DETAILS[(i / SUBJECTS.len()) % DETAILS.len()];
            let extra = DETAILS[(i * 7 + 3) % DETAILS.len()];
            record(
                &format!("{i:05}"),
                &format!("author{}", i % 37),
                &format!("Notes on {subject}: {detail} and {extra} #{}", i % 13),
            )
        })
        .collect()
}
