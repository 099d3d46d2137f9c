//! Node-link JSON interchange
//!
//! Same document layout as `networkx.node_link_data`, so exported graphs
//! open in common graph tooling and older exports without labels load back.

use crate::graph::CoauthorGraph;
use authormaps_common::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkData {
    pub directed: bool,
    pub multigraph: bool,
    #[serde(default)]
    pub graph: serde_json::Map<String, serde_json::Value>,
    pub nodes: Vec<NodeLinkNode>,
    pub links: Vec<NodeLinkEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLinkNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLinkEdge {
    pub source: String,
    pub target: String,
    pub shared_publication: u32,
}

impl CoauthorGraph {
    /// Node-link view, nodes and links sorted by id
    pub fn to_node_link(&self) -> NodeLinkData {
        let mut nodes: Vec<NodeLinkNode> = self
            .nodes()
            .map(|node| NodeLinkNode {
                id: node.id.clone(),
                label: Some(node.label.clone()),
            })
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        let mut links: Vec<NodeLinkEdge> = self
            .edges()
            .map(|(a, b, shared_publication)| {
                let (source, target) = if a.id <= b.id { (a, b) } else { (b, a) };
                NodeLinkEdge {
                    source: source.id.clone(),
                    target: target.id.clone(),
                    shared_publication,
                }
            })
            .collect();
        links.sort_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)));

        NodeLinkData {
            directed: false,
            multigraph: false,
            graph: serde_json::Map::new(),
            nodes,
            links,
        }
    }

    /// Rebuild a graph; unlabelled nodes use their id as label
    pub fn from_node_link(data: NodeLinkData) -> Result<Self> {
        if data.directed || data.multigraph {
            return Err(AppError::InvalidFormat {
                message: "expected an undirected simple graph".to_string(),
            });
        }

        let mut graph = CoauthorGraph::new();
        for node in &data.nodes {
            graph.add_node(&node.id, node.label.as_deref().unwrap_or(&node.id));
        }

        for link in &data.links {
            if link.shared_publication == 0 {
                return Err(AppError::InvalidFormat {
                    message: format!("edge {} - {} has no shared publication", link.source, link.target),
                });
            }
            if !graph.add_edge(&link.source, &link.target, link.shared_publication) {
                return Err(AppError::InvalidFormat {
                    message: format!("edge {} - {} references an unknown node", link.source, link.target),
                });
            }
        }

        Ok(graph)
    }

    /// Write the node-link document to `path`
    pub fn export_node_link(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.to_node_link())?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), nodes = self.node_count(), edges = self.edge_count(), "Graph exported");
        Ok(())
    }

    /// Read a node-link document from `path`
    pub fn load_node_link(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let data: NodeLinkData = serde_json::from_str(&text)?;
        Self::from_node_link(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CoauthorGraph {
        let mut graph = CoauthorGraph::new();
        graph.add_node("Srinivasan_S", "Sanjana Srinivasan");
        graph.add_node("Carugo_A", "Alessandro Carugo");
        graph.add_node("Tripathi_D_N", "Durga N Tripathi");
        graph.add_edge("Srinivasan_S", "Carugo_A", 3);
        graph.add_edge("Tripathi_D_N", "Carugo_A", 1);
        graph
    }

    #[test]
    fn test_node_link_layout() {
        let value = serde_json::to_value(sample().to_node_link()).unwrap();

        assert_eq!(value["directed"], false);
        assert_eq!(value["multigraph"], false);
        assert!(value["graph"].as_object().unwrap().is_empty());
        assert_eq!(value["nodes"][0]["id"], "Carugo_A");
        assert_eq!(value["links"][0]["source"], "Carugo_A");
        assert_eq!(value["links"][0]["target"], "Srinivasan_S");
        assert_eq!(value["links"][0]["shared_publication"], 3);
    }

    #[test]
    fn test_file_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("graph.json");
        let graph = sample();

        graph.export_node_link(&path).unwrap();
        let loaded = CoauthorGraph::load_node_link(&path).unwrap();

        assert_eq!(loaded.node_count(), graph.node_count());
        assert_eq!(loaded.edge_count(), graph.edge_count());
        assert_eq!(loaded.shared_publications("Alessandro Carugo", "Sanjana Srinivasan"), 3);
        assert_eq!(loaded.to_node_link(), graph.to_node_link());
    }

    #[test]
    fn test_unlabelled_nodes_load() {
        let json = r#"{
            "directed": false, "multigraph": false, "graph": {},
            "nodes": [{"id": "Carugo_A"}, {"id": "Srinivasan_S"}],
            "links": [{"source": "Carugo_A", "target": "Srinivasan_S", "shared_publication": 2}]
        }"#;
        let graph = CoauthorGraph::from_node_link(serde_json::from_str(json).unwrap()).unwrap();

        assert_eq!(graph.node("Carugo_A").unwrap().label, "Carugo_A");
        assert_eq!(graph.shared_by_id("Srinivasan_S", "Carugo_A"), 2);
    }

    #[test]
    fn test_dangling_link_is_rejected() {
        let data = NodeLinkData {
            directed: false,
            multigraph: false,
            graph: serde_json::Map::new(),
            nodes: vec![NodeLinkNode { id: "Carugo_A".into(), label: None }],
            links: vec![NodeLinkEdge {
                source: "Carugo_A".into(),
                target: "Ghost_X".into(),
                shared_publication: 1,
            }],
        };
        assert!(matches!(
            CoauthorGraph::from_node_link(data),
            Err(AppError::InvalidFormat { .. })
        ));
    }
}
