mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let paths = commands::resolve_paths(cli.data_dir.as_deref())?;

    match cli.command {
        Commands::Init { force } => commands::init::run(&paths, force),
        Commands::Import { file } => commands::import::run(&paths, &file),
        Commands::Stats { top } => commands::stats::run(&paths, top),
        Commands::Analyze { tuning, json } => commands::analyze::run(&paths, &tuning, json),
        Commands::Graph {
            tuning,
            format,
            output,
        } => commands::graph::run(&paths, &tuning, format.into(), output.as_deref()),
        Commands::Prompt {
            kind,
            topic,
            max_bookmarks,
        } => commands::prompt::run(&paths, kind, topic.as_deref(), max_bookmarks),
        Commands::Export { output } => commands::export::run(&paths, output.as_deref()),
        Commands::Version => commands::version::run(),
    }
}
