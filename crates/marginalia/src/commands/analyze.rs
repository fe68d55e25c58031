use marginalia_core::{AnalysisReport, Taxonomy};
use marginalia_store::{write_json, Paths};

use super::run_analysis;
use crate::cli::Tuning;

fn render_summary(report: &AnalysisReport, taxonomy: &Taxonomy) -> String {
    let summary = &report.summary;
    if report.is_empty() {
        let mut text = "No bookmarks to analyze.".to_string();
        if summary.skipped_records > 0 {
            text.push_str(&format!(" ({} records skipped)", summary.skipped_records));
        }
        return text;
    }

    let mut lines = vec![format!(
        "Analyzed {} bookmarks ({} skipped)",
        summary.total_bookmarks, summary.skipped_records
    )];
    lines.push(String::new());
    lines.push("Topics:".to_string());
    for cluster in report.topics_by_size() {
        let keywords: Vec<&str> = cluster
            .top_keywords(5)
            .iter()
            .map(|k| k.term.as_str())
            .collect();
        lines.push(format!(
            "  {:<24} {:>5}  {}",
            taxonomy.display_name(&cluster.topic),
            cluster.len(),
            keywords.join(", ")
        ));
    }
    lines.push(format!("  {:<24} {:>5}", "Unclassified", summary.unclassified_count));

    if !summary.top_keywords.is_empty() {
        let keywords: Vec<String> = summary
            .top_keywords
            .iter()
            .map(|k| format!("{} ({})", k.term, k.frequency))
            .collect();
        lines.push(String::new());
        lines.push(format!("Top keywords: {}", keywords.join(", ")));
    }
    if !summary.top_authors.is_empty() {
        let authors: Vec<String> = summary
            .top_authors
            .iter()
            .map(|a| format!("@{} ({})", a.author, a.count))
            .collect();
        lines.push(format!("Top authors: {}", authors.join(", ")));
    }

    lines.push(String::new());
    lines.push(format!(
        "Graph: {} nodes, {} edges, {} components",
        summary.node_count, summary.edge_count, summary.component_count
    ));
    for skipped in &report.skipped {
        lines.push(format!(
            "Skipped record #{} ({}): {}",
            skipped.index,
            skipped.id.as_deref().unwrap_or("no id"),
            skipped.reason
        ));
    }
    lines.join("\n")
}

pub fn run(paths: &Paths, tuning: &Tuning, json: bool) -> anyhow::Result<()> {
    let (report, taxonomy) = run_analysis(paths, tuning)?;
    write_json(&paths.report_file(), &report)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_summary(&report, &taxonomy));
        println!("\nReport saved to {}", paths.report_file().display());
    }
    Ok(())
}
