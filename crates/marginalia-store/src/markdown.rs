//! Markdown export of a bookmark collection

use chrono::{DateTime, Utc};
use marginalia_core::BookmarkRecord;
use std::fmt::Write as _;

/// Render `records` in stored order, stamped with `exported_at`.
///
/// Unreadable entries have nothing to show and are left out.
pub fn render(records: &[BookmarkRecord], exported_at: DateTime<Utc>) -> String {
    let mut out = String::from("# Bookmarks\n\n");
    let _ = writeln!(
        out,
        "*Exported on {}*\n",
        exported_at.format("%Y-%m-%d %H:%M:%S")
    );

    for (i, record) in records.iter().filter(|r| !r.is_unreadable()).enumerate() {
        let author = record
            .author
            .as_deref()
            .map(|a| a.trim().trim_start_matches('@'))
            .filter(|a| !a.is_empty())
            .unwrap_or("unknown");
        let _ = writeln!(out, "## {}. @{}", i + 1, author);
        let _ = writeln!(
            out,
            "*{}*\n",
            record.created_at.as_deref().unwrap_or("Unknown date")
        );
        let _ = writeln!(out, "{}\n", record.text.as_deref().unwrap_or_default());
        if let Some(url) = &record.url {
            let _ = writeln!(out, "[View post]({url})\n");
        }

        if !record.links.is_empty() {
            out.push_str("### Links\n\n");
            for link in &record.links {
                let _ = writeln!(out, "- <{link}>");
            }
            out.push('\n');
        }
        if !record.media.is_empty() {
            let _ = writeln!(out, "*{} media attachment(s)*\n", record.media.len());
        }
        out.push_str("---\n\n");
    }
    out
}
