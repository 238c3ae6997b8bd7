//! Graph construction from discovered agent records.
//!
//! # Overview
//!
//! [`AgentGraph`] is a flat adjacency map keyed by agent name. An edge
//! `A → B` means "A depends on B": B must be ordered before A. There are no
//! back-references between nodes, so cyclic inputs need no special
//! ownership handling.
//!
//! ## Dangling Dependencies
//!
//! Edges are stored even when their target has no node. Such targets are
//! listed by [`AgentGraph::dangling_dependencies`] and surface as a
//! `NotFound` error only when a resolution walk actually reaches them.
//!
//! ## Snapshot Semantics
//!
//! A graph is built once per discovery pass. Queries take `&self` and never
//! mutate it; a new discovery pass builds a new graph.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::error::GraphError;
use crate::record::{AgentNode, DiscoveryBatch};

// ---------------------------------------------------------------------------
// AgentGraph
// ---------------------------------------------------------------------------

/// A directed dependency graph over agent names.
///
/// Both maps are ordered by name so every traversal that iterates "all
/// agents" is deterministic. Per-node dependency lists keep declaration
/// order and never contain the same target twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentGraph {
    agents: BTreeMap<String, AgentNode>,
    edges: BTreeMap<String, Vec<String>>,
    discovery_failures: usize,
}

/// A declared dependency whose target has no node in the graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DanglingDependency {
    /// The agent that declared the dependency.
    pub from: String,
    /// The missing dependency name.
    pub to: String,
}

impl AgentGraph {
    /// An empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node under its name.
    ///
    /// Registering a name twice replaces the earlier node; its existing
    /// edges are kept.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EmptyName`] if the node has no name.
    pub fn add_agent(&mut self, node: AgentNode) -> Result<(), GraphError> {
        if node.name.is_empty() {
            return Err(GraphError::EmptyName);
        }

        self.edges.entry(node.name.clone()).or_default();
        if let Some(previous) = self.agents.insert(node.name.clone(), node) {
            warn!(agent = %previous.name, "duplicate agent name, later definition wins");
        }
        Ok(())
    }

    /// Append `to` to the dependency list of `from`.
    ///
    /// Neither endpoint has to exist. Returns `false` if the edge was already
    /// present.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let deps = self.edges.entry(from.to_string()).or_default();
        if deps.iter().any(|dep| dep == to) {
            return false;
        }
        deps.push(to.to_string());
        true
    }

    /// Build a graph from one discovery pass.
    ///
    /// Every record becomes a node, then each record's dependencies become
    /// edges in declaration order. When a name appears more than once the
    /// last record wins, and only its dependencies produce edges. Records
    /// with an empty name are skipped. The upstream failure count is kept
    /// for reporting and never prevents the build.
    #[instrument(skip_all)]
    pub fn from_records(batch: impl Into<DiscoveryBatch>) -> Self {
        let batch = batch.into();
        let mut graph = Self {
            discovery_failures: batch.failed,
            ..Self::default()
        };

        let mut winner: HashMap<&str, usize> = HashMap::with_capacity(batch.agents.len());
        for (idx, record) in batch.agents.iter().enumerate() {
            winner.insert(record.name.as_str(), idx);
        }

        for record in &batch.agents {
            if let Err(err) = graph.add_agent(record.clone()) {
                warn!(error = %err, "skipping agent record");
            }
        }

        for (idx, record) in batch.agents.iter().enumerate() {
            if record.name.is_empty() || winner.get(record.name.as_str()) != Some(&idx) {
                continue;
            }
            for dep in &record.dependencies {
                graph.add_edge(&record.name, dep);
            }
        }

        debug!(
            agents = graph.agent_count(),
            edges = graph.edge_count(),
            failed = graph.discovery_failures,
            "built agent graph"
        );

        graph
    }

    /// Look up a node by name.
    #[must_use]
    pub fn agent(&self, name: &str) -> Option<&AgentNode> {
        self.agents.get(name)
    }

    /// The graph-owned key for `name`, if it has a node.
    pub(crate) fn canonical_name(&self, name: &str) -> Option<&str> {
        self.agents.get_key_value(name).map(|(key, _)| key.as_str())
    }

    /// Return `true` if `name` has a node.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    /// Number of nodes.
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Sum of all outgoing edge counts.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// All nodes, ordered by name.
    pub fn agents(&self) -> impl Iterator<Item = &AgentNode> {
        self.agents.values()
    }

    /// All node names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.agents.keys().map(String::as_str)
    }

    /// Dependencies of `name` in declaration order (empty if unknown).
    #[must_use]
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.edges.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// The adjacency map, keyed by dependent name.
    #[must_use]
    pub const fn edges(&self) -> &BTreeMap<String, Vec<String>> {
        &self.edges
    }

    /// Every `(from, to)` edge, grouped by `from` in name order.
    pub fn edge_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges
            .iter()
            .flat_map(|(from, deps)| deps.iter().map(move |to| (from.as_str(), to.as_str())))
    }

    /// Number of records the discovery layer reported as unparseable.
    #[must_use]
    pub const fn discovery_failures(&self) -> usize {
        self.discovery_failures
    }

    /// List every edge whose target has no node. Never fails.
    #[must_use]
    pub fn dangling_dependencies(&self) -> Vec<DanglingDependency> {
        self.edge_pairs()
            .filter(|(_, to)| !self.contains(to))
            .map(|(from, to)| DanglingDependency {
                from: from.to_string(),
                to: to.to_string(),
            })
            .collect()
    }

    /// BLAKE3 hash of the node set and the sorted edge list.
    ///
    /// Two graphs built from equivalent discovery passes hash equal.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for node in self.agents.values() {
            hasher.update(b"n\x00");
            hasher.update(node.name.as_bytes());
            hasher.update(b"\x00");
            hasher.update(node.version().unwrap_or_default().as_bytes());
            hasher.update(b"\x00");
        }

        let mut pairs: Vec<(&str, &str)> = self.edge_pairs().collect();
        pairs.sort_unstable();
        for (from, to) in pairs {
            hasher.update(b"e\x00");
            hasher.update(from.as_bytes());
            hasher.update(b"\x00");
            hasher.update(to.as_bytes());
            hasher.update(b"\x00");
        }

        format!("blake3:{}", hasher.finalize())
    }

    /// Project the graph into a petgraph [`DiGraph`] for SCC analysis.
    ///
    /// Dangling targets become nodes of their own so no edge is dropped.
    pub(crate) fn to_petgraph(&self) -> (DiGraph<String, ()>, HashMap<String, NodeIndex>) {
        let mut graph = DiGraph::<String, ()>::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(self.agents.len());

        for name in self.agents.keys().chain(self.edges.keys()) {
            if !node_map.contains_key(name) {
                let idx = graph.add_node(name.clone());
                node_map.insert(name.clone(), idx);
            }
        }

        let mut seen: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
        for (from, to) in self.edge_pairs() {
            let from_idx = node_map[from];
            let to_idx = *node_map
                .entry(to.to_string())
                .or_insert_with(|| graph.add_node(to.to_string()));
            if seen.insert((from_idx, to_idx)) {
                graph.add_edge(from_idx, to_idx, ());
            }
        }

        (graph, node_map)
    }
}

impl fmt::Display for AgentGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "AgentGraph: {} agents, {} edges",
            self.agent_count(),
            self.edge_count()
        )?;
        for name in self.names() {
            writeln!(
                f,
                "  {name}: depends on [{}]",
                self.dependencies_of(name).join(", ")
            )?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, deps: &[&str]) -> AgentNode {
        AgentNode::new(name).with_dependencies(deps.iter().copied())
    }

    #[test]
    fn empty_batch_produces_empty_graph() {
        let graph = AgentGraph::from_records(Vec::new());
        assert_eq!(graph.agent_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.content_hash().starts_with("blake3:"));
    }

    #[test]
    fn edges_follow_declaration_order() {
        let graph = AgentGraph::from_records(vec![
            node("app", &["zeta", "alpha", "mid"]),
            node("zeta", &[]),
            node("alpha", &[]),
            node("mid", &[]),
        ]);

        assert_eq!(graph.dependencies_of("app"), ["zeta", "alpha", "mid"]);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn duplicate_edges_not_added() {
        let mut graph = AgentGraph::new();
        graph.add_agent(AgentNode::new("a")).expect("add a");
        graph.add_agent(AgentNode::new("b")).expect("add b");

        assert!(graph.add_edge("a", "b"));
        assert!(!graph.add_edge("a", "b"));
        assert_eq!(graph.edge_count(), 1);

        let graph = AgentGraph::from_records(vec![node("a", &["b", "b"]), node("b", &[])]);
        assert_eq!(graph.dependencies_of("a"), ["b"]);
    }

    #[test]
    fn empty_name_rejected() {
        let mut graph = AgentGraph::new();
        assert_eq!(graph.add_agent(AgentNode::new("")), Err(GraphError::EmptyName));

        let graph = AgentGraph::from_records(vec![node("", &["a"]), node("a", &[])]);
        assert_eq!(graph.agent_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn later_duplicate_record_wins() {
        let graph = AgentGraph::from_records(vec![
            node("a", &["b"]).with_version("1.0"),
            node("b", &[]),
            node("a", &["c"]).with_version("2.0"),
            node("c", &[]),
        ]);

        assert_eq!(graph.agent_count(), 3);
        assert_eq!(graph.agent("a").and_then(AgentNode::version), Some("2.0"));
        assert_eq!(graph.dependencies_of("a"), ["c"]);
    }

    #[test]
    fn dangling_dependencies_kept_and_listed() {
        let graph = AgentGraph::from_records(vec![
            node("a", &["b", "ghost"]),
            node("b", &["phantom"]),
        ]);

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(
            graph.dangling_dependencies(),
            vec![
                DanglingDependency {
                    from: "a".to_string(),
                    to: "ghost".to_string()
                },
                DanglingDependency {
                    from: "b".to_string(),
                    to: "phantom".to_string()
                },
            ]
        );
    }

    #[test]
    fn discovery_failures_do_not_block_build() {
        let graph = AgentGraph::from_records(DiscoveryBatch::new(vec![node("a", &[])], 4));
        assert_eq!(graph.agent_count(), 1);
        assert_eq!(graph.discovery_failures(), 4);
    }

    #[test]
    fn content_hash_changes_with_edges() {
        let without = AgentGraph::from_records(vec![node("a", &[]), node("b", &[])]);
        let with = AgentGraph::from_records(vec![node("a", &["b"]), node("b", &[])]);
        let again = AgentGraph::from_records(vec![node("b", &[]), node("a", &["b"])]);

        assert_ne!(without.content_hash(), with.content_hash());
        assert_eq!(with.content_hash(), again.content_hash());
    }

    #[test]
    fn display_lists_dependencies() {
        let graph = AgentGraph::from_records(vec![node("a", &["b", "c"]), node("b", &[])]);
        let text = graph.to_string();

        assert!(text.starts_with("AgentGraph: 2 agents, 2 edges\n"));
        assert!(text.contains("  a: depends on [b, c]\n"));
        assert!(text.contains("  b: depends on []\n"));
    }

    #[test]
    fn petgraph_projection_includes_dangling_targets() {
        let graph = AgentGraph::from_records(vec![node("a", &["b", "ghost"]), node("b", &[])]);
        let (pg, map) = graph.to_petgraph();

        assert_eq!(pg.node_count(), 3);
        assert_eq!(pg.edge_count(), 2);
        assert!(pg.contains_edge(map["a"], map["ghost"]));
    }
}
