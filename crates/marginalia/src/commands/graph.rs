use marginalia_core::{export_as, DiagramFormat};
use marginalia_store::{atomic_write, Paths};
use std::path::Path;

use super::run_analysis;
use crate::cli::Tuning;

pub fn run(
    paths: &Paths,
    tuning: &Tuning,
    format: DiagramFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let (report, _) = run_analysis(paths, tuning)?;
    let diagram = export_as(&report.graph, format);

    let target = match output {
        Some(path) => path.to_path_buf(),
        None => paths.graph_file(format.extension()),
    };
    atomic_write(&target, diagram.as_bytes())?;

    println!(
        "✓ Wrote {format} graph with {} nodes and {} edges to {}",
        report.graph.node_count(),
        report.graph.edge_count(),
        target.display()
    );
    Ok(())
}
