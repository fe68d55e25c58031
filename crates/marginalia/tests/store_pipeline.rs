mod common;

use common::{record, sample_taxonomy};
use marginalia_core::{export_as, AnalysisConfig, Analyzer, DiagramFormat};
use marginalia_store::{markdown, BookmarkStore, CollectionStats, Paths};

#[test]
fn test_import_analyze_export() {
    let dir = tempfile::tempdir().unwrap();
    let paths = Paths::at(dir.path());

    let source = dir.path().join("incoming.jsonl");
    let lines: Vec<String> = common::sample_records()
        .iter()
        .map(|rec| serde_json::to_string(rec).unwrap())
        .collect();
    std::fs::write(&source, lines.join("\n") + "\n").unwrap();
    std::fs::write(
        dir.path().join("extra.json"),
        serde_json::to_string(&vec![record("3", "carol", "duplicate"), record("9", "erin", "design tips")])
            .unwrap(),
    )
    .unwrap();

    let mut store = BookmarkStore::open(paths.bookmarks_file()).unwrap();
    store.merge(marginalia_store::load_records(&source).unwrap());
    store.merge(marginalia_store::load_records(&dir.path().join("extra.json")).unwrap());
    store.save().unwrap();

    let store = BookmarkStore::open(paths.bookmarks_file()).unwrap();
    assert_eq!(store.len(), 4);

    let analyzer = Analyzer::new(
        AnalysisConfig {
            min_similarity: 0.1,
            ..AnalysisConfig::new()
        },
        sample_taxonomy(),
    )
    .unwrap();
    let report = analyzer.analyze(store.records());
    assert_eq!(report.summary.total_bookmarks, 4);
    assert_eq!(report.unclassified, vec!["9"]);

    let dot = export_as(&report.graph, DiagramFormat::Dot);
    assert_eq!(dot.matches(" -- ").count(), report.graph.edge_count());

    let stats = CollectionStats::compute(store.records(), 3);
    assert_eq!(stats.unique_authors, 4);
    assert_eq!(stats.total_likes, 12);

    let md = markdown::render(store.records(), chrono::Utc::now());
    assert_eq!(md.matches("\n## ").count(), 4);
}
