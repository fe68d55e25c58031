//! Render a relationship graph as a diagram description

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

use crate::graph::RelationshipGraph;

/// Longest node label written, in characters
pub const MAX_LABEL_CHARS: usize = 48;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramFormat {
    #[default]
    Mermaid,
    Dot,
}

impl DiagramFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DiagramFormat::Mermaid => "mmd",
            DiagramFormat::Dot => "dot",
        }
    }
}

impl fmt::Display for DiagramFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramFormat::Mermaid => write!(f, "mermaid"),
            DiagramFormat::Dot => write!(f, "dot"),
        }
    }
}

/// Mermaid flowchart of `graph`
pub fn export(graph: &RelationshipGraph) -> String {
    export_as(graph, DiagramFormat::Mermaid)
}

pub fn export_as(graph: &RelationshipGraph, format: DiagramFormat) -> String {
    match format {
        DiagramFormat::Mermaid => render_mermaid(graph),
        DiagramFormat::Dot => render_dot(graph),
    }
}

fn render_mermaid(graph: &RelationshipGraph) -> String {
    let mut out = String::from("graph LR\n");
    for (i, node) in graph.nodes().enumerate() {
        let label = escape_mermaid(&truncate_label(&node.label));
        let _ = writeln!(out, "    n{i}[\"{label}\"]");
    }
    for (source, target, weight) in graph.index_edges() {
        let _ = writeln!(out, "    n{source} ---|{weight:.2}| n{target}");
    }
    out
}

fn render_dot(graph: &RelationshipGraph) -> String {
    let mut out = String::from("graph relationships {\n");
    for (i, node) in graph.nodes().enumerate() {
        let label = escape_dot(&truncate_label(&node.label));
        let _ = writeln!(out, "    n{i} [label=\"{label}\"];");
    }
    for (source, target, weight) in graph.index_edges() {
        let _ = writeln!(out, "    n{source} -- n{target} [label=\"{weight:.2}\"];");
    }
    out.push_str("}\n");
    out
}

/// Collapse whitespace and control characters, then cut to [`MAX_LABEL_CHARS`]
fn truncate_label(label: &str) -> String {
    let flat: String = label
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let flat = flat.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX_LABEL_CHARS {
        return flat;
    }
    let mut cut: String = flat.chars().take(MAX_LABEL_CHARS - 1).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

fn escape_mermaid(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '"' | '#' | '|' | '[' | ']' | '(' | ')' | '{' | '}' | '<' | '>' | '`' => {
                let _ = write!(out, "#{};", c as u32);
            }
            _ => out.push(c),
        }
    }
    out
}

fn escape_dot(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::taxonomy::Taxonomy;
    use crate::types::Bookmark;
    use chrono::Utc;

    fn graph_of(texts: &[(&str, &str)]) -> RelationshipGraph {
        let now = Utc::now();
        let bookmarks: Vec<_> = texts
            .iter()
            .map(|(id, text)| Bookmark::new(*id, "", *text, now))
            .collect();
        build_graph(&bookmarks, &Taxonomy::new(), 0.0).unwrap()
    }

    #[test]
    fn test_empty_graph() {
        let graph = graph_of(&[]);
        assert_eq!(export(&graph), "graph LR\n");
        assert_eq!(
            export_as(&graph, DiagramFormat::Dot),
            "graph relationships {\n}\n"
        );
    }

    #[test]
    fn test_mermaid_output() {
        let graph = graph_of(&[("a", "rust async"), ("b", "rust async"), ("c", "bread")]);
        let expected = "graph LR\n    n0[\"rust async\"]\n    n1[\"rust async\"]\n    n2[\"bread\"]\n    n0 ---|1.00| n1\n";
        assert_eq!(export(&graph), expected);
    }

    #[test]
    fn test_dot_output() {
        let graph = graph_of(&[("a", "quoted \"rust\" async"), ("b", "rust async")]);
        let dot = export_as(&graph, DiagramFormat::Dot);
        assert!(dot.contains("n0 [label=\"quoted \\\"rust\\\" async\"];"));
        assert!(dot.contains("n0 -- n1 [label=\"0.67\"];"));
    }

    #[test]
    fn test_output_is_stable() {
        let forward = graph_of(&[("x", "tokio runtime"), ("y", "tokio executor")]);
        let backward = graph_of(&[("y", "tokio executor"), ("x", "tokio runtime")]);
        assert_eq!(export(&forward), export(&backward));
    }

    #[test]
    fn test_escapes_structural_characters() {
        let escaped = escape_mermaid("a \"b\" [c] (d) {e} <f> #g |h| `i`");
        for c in ['"', '[', ']', '(', ')', '{', '}', '<', '>', '|', '`'] {
            assert!(!escaped.contains(c), "{c} survived: {escaped}");
        }
        assert!(escaped.contains("#34;b#34;"));
        assert!(escaped.contains("#35;g"));
    }

    #[test]
    fn test_newlines_collapse() {
        assert_eq!(truncate_label("line one\nline\ttwo\r\n"), "line one line two");
    }

    #[test]
    fn test_long_labels_truncated() {
        let long = "word ".repeat(40);
        let label = truncate_label(&long);
        assert!(label.chars().count() <= MAX_LABEL_CHARS);
        assert!(label.ends_with('…'));
        assert_eq!(truncate_label("short"), "short");
    }

    #[test]
    fn test_format_names() {
        assert_eq!(DiagramFormat::Mermaid.extension(), "mmd");
        assert_eq!(DiagramFormat::Dot.to_string(), "dot");
    }
}
