use clap::{Parser, Subcommand, ValueEnum};
use marginalia_core::{DiagramFormat, GraphGranularity};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "marginalia")]
#[command(version)]
#[command(about = "Topic analysis and knowledge graphs for saved bookmarks")]
pub struct Cli {
    /// Data directory (defaults to ~/.marginalia)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory with default config and taxonomy
    Init {
        /// Overwrite existing config and taxonomy files
        #[arg(long)]
        force: bool,
    },

    /// Import bookmarks from a JSON array or JSONL file
    Import {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show collection statistics
    Stats {
        /// Number of top authors listed
        #[arg(long, default_value_t = 5)]
        top: usize,
    },

    /// Classify, cluster and relate the stored bookmarks
    Analyze {
        #[command(flatten)]
        tuning: Tuning,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the relationship graph as a diagram
    Graph {
        #[command(flatten)]
        tuning: Tuning,

        #[arg(long, value_enum, default_value_t = FormatArg::Mermaid)]
        format: FormatArg,

        /// Output file (defaults to reports/knowledge_graph.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print an LLM prompt built from the analysis
    Prompt {
        /// Prompt to build (defaults to topic with --topic, else overview)
        #[arg(short, long, value_enum)]
        kind: Option<PromptKind>,

        #[arg(short, long)]
        topic: Option<String>,

        /// Bookmarks quoted per topic prompt
        #[arg(long, default_value_t = 50)]
        max_bookmarks: usize,
    },

    /// Export the collection as markdown
    Export {
        /// Output file (defaults to reports/bookmarks.md)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print version information
    Version,
}

/// Flags that override `config.json`
#[derive(Debug, Clone, Default, clap::Args)]
pub struct Tuning {
    /// Edges need similarity strictly above this, within [0, 1]
    #[arg(long)]
    pub min_similarity: Option<f64>,

    /// Keywords kept per bookmark
    #[arg(long)]
    pub max_keywords: Option<usize>,

    #[arg(long, value_enum)]
    pub granularity: Option<GranularityArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Mermaid,
    Dot,
}

impl From<FormatArg> for DiagramFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Mermaid => DiagramFormat::Mermaid,
            FormatArg::Dot => DiagramFormat::Dot,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PromptKind {
    /// One topic's bookmarks with its focus list (needs --topic)
    Topic,
    /// Every topic with sizes and keywords
    Overview,
    StudyGuide,
    Insights,
    ActionItems,
    /// Education, AI/ML and programming bookmarks as a curriculum
    LearningPath,
    /// Tool bookmarks and bookmarks naming known tools
    Tools,
    /// One topic plus related bookmarks from other topics (needs --topic)
    DeepDive,
}

impl PromptKind {
    pub fn resolve(kind: Option<PromptKind>, topic: Option<&str>) -> PromptKind {
        match (kind, topic) {
            (Some(kind), _) => kind,
            (None, Some(_)) => PromptKind::Topic,
            (None, None) => PromptKind::Overview,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GranularityArg {
    Bookmark,
    Topic,
}

impl From<GranularityArg> for GraphGranularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Bookmark => GraphGranularity::Bookmark,
            GranularityArg::Topic => GraphGranularity::Topic,
        }
    }
}
