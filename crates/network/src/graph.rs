//! Co-author graph
//!
//! Undirected graph over short ids. Each node carries the display name of
//! the co-author; each edge the number of publications both ends share.

use crate::aggregator::PairWeights;
use crate::name::{display_name, record_name_of, short_id};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Graph node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorNode {
    /// Short id, `Last_F_M`
    pub id: String,
    /// Display name, `First Middle Last`
    pub label: String,
}

/// Graph edge payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaboration {
    pub shared_publication: u32,
}

/// Weighted undirected co-author graph
#[derive(Debug, Clone, Default)]
pub struct CoauthorGraph {
    graph: UnGraph<AuthorNode, Collaboration>,
    /// short id -> node
    index: HashMap<String, NodeIndex>,
    /// display or record name -> short id
    names: HashMap<String, String>,
}

impl CoauthorGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from exact-match co-authors and short-id pair weights.
    ///
    /// Only co-authors with at least one edge become nodes. Names sharing
    /// a short id are all resolvable; the node shows the longest of them.
    pub fn build(coauthors: &BTreeSet<String>, weights: &PairWeights) -> Self {
        let mut labels: HashMap<String, String> = HashMap::new();
        for record in coauthors {
            let name = display_name(record);
            let label = labels.entry(short_id(record)).or_default();
            if name.chars().count() > label.chars().count() {
                *label = name;
            }
        }

        let connected: BTreeSet<&str> = weights
            .keys()
            .flat_map(|(a, b)| [a.as_str(), b.as_str()])
            .collect();

        let mut graph = Self::new();
        for id in &connected {
            let label = labels.get(*id).cloned().unwrap_or_else(|| id.to_string());
            graph.add_node(id, &label);
        }

        for ((a, b), weight) in weights {
            graph.add_edge(a, b, *weight);
        }

        for record in coauthors {
            let id = short_id(record);
            if graph.contains(&id) {
                graph.names.insert(display_name(record), id.clone());
                graph.names.insert(record.clone(), id);
            }
        }

        let dropped = labels.keys().filter(|id| !graph.contains(id)).count();
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            dropped,
            "Co-author graph built"
        );

        graph
    }

    /// Add a node, or return the existing one with this id
    pub fn add_node(&mut self, id: &str, label: &str) -> NodeIndex {
        if let Some(idx) = self.index.get(id) {
            return *idx;
        }

        let idx = self.graph.add_node(AuthorNode {
            id: id.to_string(),
            label: label.to_string(),
        });
        self.index.insert(id.to_string(), idx);
        self.names.insert(label.to_string(), id.to_string());
        self.names.insert(record_name_of(label), id.to_string());
        idx
    }

    /// Add or overwrite the edge between two existing nodes.
    ///
    /// Self loops, unknown ids and zero weights are ignored.
    pub fn add_edge(&mut self, a: &str, b: &str, shared_publication: u32) -> bool {
        if a == b || shared_publication == 0 {
            return false;
        }
        let (Some(&ia), Some(&ib)) = (self.index.get(a), self.index.get(b)) else {
            return false;
        };
        self.graph.update_edge(ia, ib, Collaboration { shared_publication });
        true
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
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&AuthorNode> {
        self.index.get(id).map(|idx| &self.graph[*idx])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &AuthorNode> {
        self.graph.node_weights()
    }

    /// Edges as (node, node, shared publications)
    pub fn edges(&self) -> impl Iterator<Item = (&AuthorNode, &AuthorNode, u32)> {
        self.graph.edge_references().map(|edge| {
            (
                &self.graph[edge.source()],
                &self.graph[edge.target()],
                edge.weight().shared_publication,
            )
        })
    }

    /// Short id of a display or record name present in the graph
    pub fn resolve_name(&self, name: &str) -> Option<&str> {
        let normalized = name.split_whitespace().collect::<Vec<_>>().join(" ");
        self.names.get(&normalized).map(String::as_str)
    }

    /// Shared publications of two co-authors by name; 0 when unknown or unlinked
    pub fn shared_publications(&self, a: &str, b: &str) -> u32 {
        match (self.resolve_name(a), self.resolve_name(b)) {
            (Some(a), Some(b)) => self.shared_by_id(a, b),
            _ => 0,
        }
    }

    /// Shared publications of two short ids, in either order
    pub fn shared_by_id(&self, a: &str, b: &str) -> u32 {
        let (Some(&ia), Some(&ib)) = (self.index.get(a), self.index.get(b)) else {
            return 0;
        };
        self.graph
            .find_edge(ia, ib)
            .map(|e| self.graph[e].shared_publication)
            .unwrap_or(0)
    }

    /// Neighbours of a short id with the shared count, strongest first
    pub fn collaborators(&self, id: &str) -> Vec<(&AuthorNode, u32)> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<(&AuthorNode, u32)> = self
            .graph
            .edges(idx)
            .map(|edge| {
                let other = if edge.source() == idx { edge.target() } else { edge.source() };
                (&self.graph[other], edge.weight().shared_publication)
            })
            .collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.id.cmp(&b.0.id)));
        out
    }

    /// Smallest and largest edge weight
    pub fn weight_range(&self) -> Option<(u32, u32)> {
        let mut weights = self.graph.edge_weights().map(|c| c.shared_publication);
        let first = weights.next()?;
        Some(weights.fold((first, first), |(lo, hi), w| (lo.min(w), hi.max(w))))
    }

    /// Underlying petgraph graph
    pub fn inner(&self) -> &UnGraph<AuthorNode, Collaboration> {
        &self.graph
    }
}
