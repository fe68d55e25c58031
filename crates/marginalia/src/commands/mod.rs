pub mod analyze;
pub mod export;
pub mod graph;
pub mod import;
pub mod init;
pub mod prompt;
pub mod stats;
pub mod version;

use anyhow::Context;
use marginalia_core::{AnalysisConfig, AnalysisReport, Analyzer, Taxonomy};
use marginalia_store::{read_json, BookmarkStore, Paths};
use std::path::Path;
use tracing::debug;

use crate::cli::Tuning;

pub fn resolve_paths(data_dir: Option<&Path>) -> anyhow::Result<Paths> {
    match data_dir {
        Some(dir) => Ok(Paths::at(dir)),
        None => Ok(Paths::new()?),
    }
}

/// `config.json` if present, else defaults; flags override either
pub fn load_config(paths: &Paths, tuning: &Tuning) -> anyhow::Result<AnalysisConfig> {
    let mut config: AnalysisConfig = read_json(&paths.config_file())?.unwrap_or_default();
    if let Some(min_similarity) = tuning.min_similarity {
        config.min_similarity = min_similarity;
    }
    if let Some(max_keywords) = tuning.max_keywords {
        config.max_keywords = max_keywords;
    }
    if let Some(granularity) = tuning.granularity {
        config.granularity = granularity.into();
    }
    config.validate()?;
    Ok(config)
}

/// `taxonomy.json` if present, else the built-in taxonomy
pub fn load_taxonomy(paths: &Paths) -> anyhow::Result<Taxonomy> {
    let path = paths.taxonomy_file();
    if path.exists() {
        let content = std::fs::read_to_string(&path)?;
        let taxonomy = Taxonomy::from_json(&content)
            .with_context(|| format!("failed to load {}", path.display()))?;
        debug!(topics = taxonomy.len(), path = %path.display(), "loaded taxonomy");
        Ok(taxonomy)
    } else {
        Ok(Taxonomy::builtin()?)
    }
}

pub fn run_analysis(paths: &Paths, tuning: &Tuning) -> anyhow::Result<(AnalysisReport, Taxonomy)> {
    let config = load_config(paths, tuning)?;
    let taxonomy = load_taxonomy(paths)?;
    let store = BookmarkStore::open(paths.bookmarks_file())?;
    let analyzer = Analyzer::new(config, taxonomy)?;
    let report = analyzer.analyze(store.records());
    Ok((report, analyzer.taxonomy().clone()))
}
