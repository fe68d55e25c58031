//! Path resolution for the data directory

use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

/// Directory created under `$HOME` when no explicit root is given
pub const DATA_DIR_NAME: &str = ".marginalia";

/// Resolves the files kept in the data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    /// `$HOME/.marginalia`
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().ok_or(StoreError::NoHomeDir)?;
        Ok(Self::at(home.join(DATA_DIR_NAME)))
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bookmarks_file(&self) -> PathBuf {
        self.root.join("bookmarks.json")
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn taxonomy_file(&self) -> PathBuf {
        self.root.join("taxonomy.json")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join("reports")
    }

    /// Latest analysis report
    pub fn report_file(&self) -> PathBuf {
        self.reports_dir().join("analysis.json")
    }

    /// Diagram output, `extension` without the dot
    pub fn graph_file(&self, extension: &str) -> PathBuf {
        self.reports_dir()
            .join(format!("knowledge_graph.{extension}"))
    }

    pub fn markdown_file(&self) -> PathBuf {
        self.reports_dir().join("bookmarks.md")
    }

    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.reports_dir())
    }
}
