use marginalia_store::{BookmarkStore, CollectionStats, Paths};

fn render_stats(stats: &CollectionStats) -> String {
    if stats.total_records == 0 {
        return "No bookmarks stored. Run `marginalia import --file <path>` first.".to_string();
    }

    let mut lines = vec![
        format!("Total bookmarks: {}", stats.total_records),
        format!("Unique authors: {}", stats.unique_authors),
    ];
    if let (Some(earliest), Some(latest)) = (stats.earliest, stats.latest) {
        lines.push(format!(
            "Date range: {} to {}",
            earliest.format("%Y-%m-%d"),
            latest.format("%Y-%m-%d")
        ));
    }
    lines.push(format!(
        "Engagement: {} likes, {} reposts, {} replies",
        stats.total_likes, stats.total_reposts, stats.total_replies
    ));
    if stats.unreadable > 0 {
        lines.push(format!(
            "Unreadable entries: {} (skipped by analysis)",
            stats.unreadable
        ));
    }
    if stats.threads > 0 {
        lines.push(format!("Threads: {}", stats.threads));
    }
    for tally in &stats.top_authors {
        lines.push(format!("Top author: @{} ({})", tally.author, tally.count));
    }
    lines.join("\n")
}

pub fn run(paths: &Paths, top: usize) -> anyhow::Result<()> {
    let store = BookmarkStore::open(paths.bookmarks_file())?;
    let stats = CollectionStats::compute(store.records(), top);
    println!("{}", render_stats(&stats));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use marginalia_core::BookmarkRecord;

    #[test]
    fn test_render_empty() {
        let text = render_stats(&CollectionStats::default());
        assert!(text.starts_with("No bookmarks stored"));
    }

    #[test]
    fn test_render_stats() {
        let records = vec![
            BookmarkRecord {
                id: Some("1".to_string()),
                author: Some("ferris".to_string()),
                created_at: Some("2024-01-05T00:00:00Z".to_string()),
                ..Default::default()
            },
            BookmarkRecord {
                id: Some("2".to_string()),
                author: Some("ferris".to_string()),
                created_at: Some("2024-02-05T00:00:00Z".to_string()),
                ..Default::default()
            },
        ];
        let text = render_stats(&CollectionStats::compute(&records, 5));
        assert!(text.contains("Total bookmarks: 2"));
        assert!(text.contains("Date range: 2024-01-05 to 2024-02-05"));
        assert!(text.contains("Top author: @ferris (2)"));
        assert!(!text.contains("Threads"));
        assert!(!text.contains("Unreadable"));
    }

    #[test]
    fn test_render_unreadable() {
        let records = vec![BookmarkRecord::unreadable(
            serde_json::json!({"id": "1", "text": 42}),
            "invalid type",
        )];
        let text = render_stats(&CollectionStats::compute(&records, 5));
        assert!(text.contains("Unreadable entries: 1"));
    }
}
