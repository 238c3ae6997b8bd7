//! Structured node/edge payload.

use serde::{Deserialize, Serialize};

use crate::graph::AgentGraph;

/// Nodes and flattened edges of a graph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// One agent in the payload. `id` and `name` are both the agent name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// One dependency edge: `from` depends on `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

impl GraphData {
    /// One node per agent in name order, one edge per adjacency entry.
    #[must_use]
    pub fn from_graph(graph: &AgentGraph) -> Self {
        let nodes = graph
            .agents()
            .map(|node| GraphNode {
                id: node.name.clone(),
                name: node.name.clone(),
                version: node.version().map(str::to_string),
            })
            .collect();

        let edges = graph
            .edge_pairs()
            .map(|(from, to)| GraphEdge {
                from: from.to_string(),
                to: to.to_string(),
            })
            .collect();

        Self { nodes, edges }
    }
}

/// Pretty-printed JSON for [`GraphData::from_graph`].
///
/// # Errors
///
/// Returns the serializer error if encoding fails.
pub fn render_json(data: &GraphData) -> serde_json::Result<String> {
    serde_json::to_string_pretty(data)
}
