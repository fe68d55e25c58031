//! Weighted similarity graph over bookmarks or topics

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

use crate::classifier::TopicClassifier;
use crate::cluster::{cluster_profiles, Clustering};
use crate::config::{validate_min_similarity, AnalysisConfig, GraphGranularity};
use crate::error::Result;
use crate::keywords::KeywordExtractor;
use crate::profile::{build_profiles, BookmarkProfile};
use crate::taxonomy::Taxonomy;
use crate::types::Bookmark;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Bookmark id or topic name
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

/// Serialized form of [`RelationshipGraph`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphSnapshot {
    granularity: GraphGranularity,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

/// Undirected weighted graph.
///
/// Node indices follow identifier order and every edge is stored once
/// with its lower-index endpoint as source. There are no self edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "GraphSnapshot", try_from = "GraphSnapshot")]
pub struct RelationshipGraph {
    graph: UnGraph<GraphNode, f64>,
    node_indices: HashMap<String, NodeIndex>,
    granularity: GraphGranularity,
}

impl RelationshipGraph {
    pub fn empty(granularity: GraphGranularity) -> Self {
        Self {
            graph: UnGraph::default(),
            node_indices: HashMap::new(),
            granularity,
        }
    }

    fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.node_indices.insert(id, idx);
        idx
    }

    fn add_edge(&mut self, a: NodeIndex, b: NodeIndex, weight: f64) {
        let (source, target) = if a < b { (a, b) } else { (b, a) };
        self.graph.add_edge(source, target, weight);
    }

    pub fn granularity(&self) -> GraphGranularity {
        self.granularity
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    /// Nodes in index order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Edges in `(source index, target index)` order
    pub fn edges(&self) -> Vec<GraphEdge> {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .map(|e| (e.source(), e.target(), *e.weight()))
            .collect();
        edges.sort_by_key(|(s, t, _)| (*s, *t));
        edges
            .into_iter()
            .map(|(s, t, weight)| GraphEdge {
                source: self.graph[s].id.clone(),
                target: self.graph[t].id.clone(),
                weight,
            })
            .collect()
    }

    /// Edge endpoints as node indices, canonical order
    pub(crate) fn index_edges(&self) -> Vec<(usize, usize, f64)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), *e.weight()))
            .collect();
        edges.sort_by_key(|(s, t, _)| (*s, *t));
        edges
    }

    pub fn weight(&self, a: &str, b: &str) -> Option<f64> {
        let ia = *self.node_indices.get(a)?;
        let ib = *self.node_indices.get(b)?;
        let edge = self.graph.find_edge(ia, ib)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Neighbor ids of `id` in index order
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(id) else {
            return Vec::new();
        };
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors(idx).collect();
        neighbors.sort();
        neighbors.dedup();
        neighbors
            .into_iter()
            .map(|n| self.graph[n].id.as_str())
            .collect()
    }

    /// Up to `limit` neighbors of `id` with their weights, strongest first,
    /// ties broken by id
    pub fn related(&self, id: &str, limit: usize) -> Vec<(&str, f64)> {
        let Some(&idx) = self.node_indices.get(id) else {
            return Vec::new();
        };
        let mut related: Vec<(&str, f64)> = self
            .graph
            .edges(idx)
            .map(|e| {
                let other = if e.source() == idx { e.target() } else { e.source() };
                (self.graph[other].id.as_str(), *e.weight())
            })
            .collect();
        related.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        related.dedup_by(|a, b| a.0 == b.0);
        related.truncate(limit);
        related
    }

    pub fn components(&self) -> usize {
        connected_components(&self.graph)
    }

    /// Connected components as id groups, ordered by their first node
    pub fn component_groups(&self) -> Vec<Vec<String>> {
        let mut sets = UnionFind::<usize>::new(self.graph.node_count());
        for edge in self.graph.edge_references() {
            sets.union(edge.source().index(), edge.target().index());
        }

        let mut slots: HashMap<usize, usize> = HashMap::new();
        let mut groups: Vec<Vec<String>> = Vec::new();
        for idx in self.graph.node_indices() {
            let root = sets.find(idx.index());
            let slot = *slots.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(self.graph[idx].id.clone());
        }
        groups
    }
}

impl PartialEq for RelationshipGraph {
    fn eq(&self, other: &Self) -> bool {
        self.granularity == other.granularity
            && self.nodes().eq(other.nodes())
            && self.edges() == other.edges()
    }
}

impl From<RelationshipGraph> for GraphSnapshot {
    fn from(graph: RelationshipGraph) -> Self {
        GraphSnapshot {
            granularity: graph.granularity,
            nodes: graph.nodes().cloned().collect(),
            edges: graph.edges(),
        }
    }
}

impl TryFrom<GraphSnapshot> for RelationshipGraph {
    type Error = String;

    fn try_from(snapshot: GraphSnapshot) -> std::result::Result<Self, Self::Error> {
        let mut graph = RelationshipGraph::empty(snapshot.granularity);
        for node in snapshot.nodes {
            if graph.contains(&node.id) {
                return Err(format!("duplicate node {}", node.id));
            }
            graph.add_node(node);
        }
        for edge in snapshot.edges {
            let lookup = |id: &str| {
                graph
                    .node_indices
                    .get(id)
                    .copied()
                    .ok_or_else(|| format!("edge references unknown node {id}"))
            };
            let (a, b) = (lookup(&edge.source)?, lookup(&edge.target)?);
            if a == b {
                return Err(format!("self edge on {}", edge.source));
            }
            graph.add_edge(a, b, edge.weight);
        }
        Ok(graph)
    }
}

/// Jaccard coefficient; two empty sets score 0
pub fn jaccard<T: Eq + std::hash::Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Builds a [`RelationshipGraph`] from profiled bookmarks or topic clusters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphBuilder {
    min_similarity: f64,
    granularity: GraphGranularity,
}

impl GraphBuilder {
    pub fn new(min_similarity: f64) -> Result<Self> {
        validate_min_similarity(min_similarity)?;
        Ok(Self {
            min_similarity,
            granularity: GraphGranularity::default(),
        })
    }

    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        Ok(Self::new(config.min_similarity)?.granularity(config.granularity))
    }

    pub fn granularity(mut self, granularity: GraphGranularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn min_similarity(&self) -> f64 {
        self.min_similarity
    }

    pub fn build(
        &self,
        profiles: &[BookmarkProfile],
        clustering: &Clustering,
        taxonomy: &Taxonomy,
    ) -> RelationshipGraph {
        let graph = match self.granularity {
            GraphGranularity::Bookmark => self.build_bookmark_graph(profiles),
            GraphGranularity::Topic => self.build_topic_graph(clustering, taxonomy),
        };
        debug!(
            granularity = ?self.granularity,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built relationship graph"
        );
        graph
    }

    fn build_bookmark_graph(&self, profiles: &[BookmarkProfile]) -> RelationshipGraph {
        let mut ordered: Vec<&BookmarkProfile> = profiles.iter().collect();
        ordered.sort_by(|a, b| a.id().cmp(b.id()));
        ordered.dedup_by(|later, earlier| later.id() == earlier.id());

        let mut graph = RelationshipGraph::empty(GraphGranularity::Bookmark);
        let indices: Vec<NodeIndex> = ordered
            .iter()
            .map(|p| {
                graph.add_node(GraphNode {
                    id: p.id().to_string(),
                    label: bookmark_label(p.bookmark),
                })
            })
            .collect();

        let keyword_sets: Vec<HashSet<&str>> = ordered.iter().map(|p| p.keyword_set()).collect();

        // Pairs with no shared keyword score 0 and can never pass the threshold
        let mut postings: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, set) in keyword_sets.iter().enumerate() {
            for &term in set {
                postings.entry(term).or_default().push(i);
            }
        }
        let mut candidates: BTreeSet<(usize, usize)> = BTreeSet::new();
        for members in postings.values() {
            for (pos, &i) in members.iter().enumerate() {
                for &j in &members[pos + 1..] {
                    candidates.insert((i.min(j), i.max(j)));
                }
            }
        }

        for (i, j) in candidates {
            let similarity = jaccard(&keyword_sets[i], &keyword_sets[j]);
            if similarity > self.min_similarity {
                graph.add_edge(indices[i], indices[j], similarity);
            }
        }
        graph
    }

    fn build_topic_graph(&self, clustering: &Clustering, taxonomy: &Taxonomy) -> RelationshipGraph {
        let mut graph = RelationshipGraph::empty(GraphGranularity::Topic);
        let clusters: Vec<_> = clustering.clusters.values().collect();
        let indices: Vec<NodeIndex> = clusters
            .iter()
            .map(|c| {
                graph.add_node(GraphNode {
                    id: c.topic.clone(),
                    label: taxonomy.display_name(&c.topic),
                })
            })
            .collect();
        let member_sets: Vec<HashSet<&str>> = clusters
            .iter()
            .map(|c| c.bookmark_ids.iter().map(String::as_str).collect())
            .collect();

        for i in 0..clusters.len() {
            for j in i + 1..clusters.len() {
                let similarity = jaccard(&member_sets[i], &member_sets[j]);
                if similarity > self.min_similarity {
                    graph.add_edge(indices[i], indices[j], similarity);
                }
            }
        }
        graph
    }
}

fn bookmark_label(bookmark: &Bookmark) -> String {
    let text = bookmark.text.split_whitespace().collect::<Vec<_>>().join(" ");
    match (bookmark.author.is_empty(), text.is_empty()) {
        (_, true) => bookmark.id.clone(),
        (true, false) => text,
        (false, false) => format!("@{}: {}", bookmark.author, text),
    }
}

/// Bookmark-granularity graph with default keyword settings
pub fn build_graph(
    bookmarks: &[Bookmark],
    taxonomy: &Taxonomy,
    min_similarity: f64,
) -> Result<RelationshipGraph> {
    let builder = GraphBuilder::new(min_similarity)?;
    let config = AnalysisConfig::new();
    let classifier = TopicClassifier::new(taxonomy);
    let extractor = KeywordExtractor::from_config(&config);
    let profiles = build_profiles(bookmarks, &extractor, &classifier, config.max_keywords);
    let clustering = cluster_profiles(&profiles);
    Ok(builder.build(&profiles, &clustering, taxonomy))
}
