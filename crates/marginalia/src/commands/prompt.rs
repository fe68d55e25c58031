use marginalia_core::{estimate_tokens, AnalysisReport, PromptBuilder, Taxonomy};
use marginalia_store::Paths;

use super::run_analysis;
use crate::cli::{GranularityArg, PromptKind, Tuning};

fn build_prompt(
    report: &AnalysisReport,
    taxonomy: &Taxonomy,
    kind: PromptKind,
    topic: Option<&str>,
    max_bookmarks: usize,
) -> anyhow::Result<String> {
    let builder = PromptBuilder::new(taxonomy).max_bookmarks(max_bookmarks);
    let with_topics = |e: marginalia_core::AnalysisError| {
        let known: Vec<&str> = report.clusters.keys().map(String::as_str).collect();
        anyhow::anyhow!("{e} (topics with bookmarks: {})", known.join(", "))
    };
    let require_topic = || topic.ok_or_else(|| anyhow::anyhow!("--topic is required for this prompt"));

    let prompt = match kind {
        PromptKind::Topic => builder
            .topic_prompt(report, require_topic()?)
            .map_err(with_topics)?,
        PromptKind::Overview => builder.overview_prompt(report),
        PromptKind::StudyGuide => builder.study_guide_prompt(report),
        PromptKind::Insights => builder.insights_prompt(report),
        PromptKind::ActionItems => builder.action_items_prompt(report),
        PromptKind::LearningPath => builder.learning_path_prompt(report).map_err(with_topics)?,
        PromptKind::Tools => builder.tool_comparison_prompt(report).map_err(with_topics)?,
        PromptKind::DeepDive => builder
            .deep_dive_prompt(report, require_topic()?)
            .map_err(with_topics)?,
    };
    Ok(prompt)
}

pub fn run(
    paths: &Paths,
    kind: Option<PromptKind>,
    topic: Option<&str>,
    max_bookmarks: usize,
) -> anyhow::Result<()> {
    let kind = PromptKind::resolve(kind, topic);
    // Related bookmarks only exist in a bookmark graph
    let tuning = match kind {
        PromptKind::DeepDive => Tuning {
            granularity: Some(GranularityArg::Bookmark),
            ..Tuning::default()
        },
        _ => Tuning::default(),
    };
    let (report, taxonomy) = run_analysis(paths, &tuning)?;
    if report.is_empty() {
        anyhow::bail!("no bookmarks to build a prompt from");
    }

    let prompt = build_prompt(&report, &taxonomy, kind, topic, max_bookmarks)?;
    println!("{prompt}");
    eprintln!("\n~{} tokens", estimate_tokens(&prompt));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use marginalia_core::{analyze, BookmarkRecord};
    use marginalia_store::BookmarkStore;

    fn record(id: &str, text: &str) -> BookmarkRecord {
        BookmarkRecord {
            id: Some(id.to_string()),
            text: Some(text.to_string()),
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
            ..Default::default()
        }
    }

    fn taxonomy() -> Taxonomy {
        Taxonomy::new()
            .with_topic("tools", ["editor"])
            .with_topic("programming", ["python"])
    }

    fn report() -> AnalysisReport {
        analyze(
            &[
                record("1", "a python editor"),
                record("2", "python packaging"),
            ],
            &taxonomy(),
            0.1,
        )
        .unwrap()
    }

    #[test]
    fn test_each_kind_builds() {
        let taxonomy = taxonomy();
        let report = report();
        for kind in [
            PromptKind::Overview,
            PromptKind::StudyGuide,
            PromptKind::Insights,
            PromptKind::ActionItems,
            PromptKind::LearningPath,
            PromptKind::Tools,
        ] {
            let prompt = build_prompt(&report, &taxonomy, kind, None, 10).unwrap();
            assert!(prompt.contains("python"), "{kind:?}");
        }
        let deep = build_prompt(&report, &taxonomy, PromptKind::DeepDive, Some("tools"), 10).unwrap();
        assert!(deep.contains("- python packaging"));
    }

    #[test]
    fn test_topic_kinds_need_topic() {
        let taxonomy = taxonomy();
        let report = report();
        let err = build_prompt(&report, &taxonomy, PromptKind::DeepDive, None, 10).unwrap_err();
        assert!(err.to_string().contains("--topic"));

        let err = build_prompt(&report, &taxonomy, PromptKind::Topic, Some("cooking"), 10).unwrap_err();
        assert!(err.to_string().contains("topics with bookmarks: programming, tools"));
    }

    #[test]
    fn test_run_on_empty_store_fails() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::at(dir.path());
        BookmarkStore::open(paths.bookmarks_file()).unwrap().save().unwrap();
        assert!(run(&paths, Some(PromptKind::Insights), None, 10).is_err());
    }
}
