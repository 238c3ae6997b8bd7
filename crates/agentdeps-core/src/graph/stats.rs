//! Summary statistics for the agent dependency graph.
//!
//! # Statistics Provided
//!
//! - **total_nodes**: Number of agents with a node.
//! - **total_edges**: Sum of per-agent dependency counts. Equal to the
//!   distinct edge count because the builder drops duplicate edges.
//! - **max_depth**: Longest dependency chain over all agents, measured in
//!   edges. Cycle-tolerant: re-entering a node already on the current path
//!   counts as depth 0 instead of failing.
//! - **circular_dependency_count**: Number of cycle groups (SCCs with more
//!   than one member, plus self-loops).
//! - **disconnected_nodes**: `total_nodes` minus the agents marked by a
//!   bidirectional connectivity sweep. The sweep is re-seeded until every
//!   agent is marked, so this is always zero. It is kept as computed so a
//!   redefinition (for example "unreachable from a designated root") is a
//!   deliberate change.
//!
//! # Limits
//!
//! [`dependency_depth`] recurses once per edge on the current path and does
//! not memoize, so it suits graphs of hand-written agent definitions (tens to
//! low thousands of agents). A single chain of tens of thousands of agents
//! can exhaust the default thread stack.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::graph::build::AgentGraph;
use crate::graph::cycles::cycle_groups;

// ---------------------------------------------------------------------------
// GraphSummary
// ---------------------------------------------------------------------------

/// Aggregate statistics for one graph snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphSummary {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub max_depth: usize,
    pub circular_dependency_count: usize,
    pub disconnected_nodes: usize,
}

impl GraphSummary {
    /// Compute every statistic for `graph`.
    #[instrument(skip_all)]
    #[must_use]
    pub fn from_graph(graph: &AgentGraph) -> Self {
        let total_nodes = graph.agent_count();
        let total_edges = graph.edge_count();

        let max_depth = graph
            .names()
            .map(|name| dependency_depth(graph, name))
            .max()
            .unwrap_or(0);

        let circular_dependency_count = cycle_groups(graph).len();

        let marked = connectivity_sweep(graph);
        let marked_agents = marked.iter().filter(|name| graph.contains(name)).count();
        let disconnected_nodes = total_nodes.saturating_sub(marked_agents);

        Self {
            total_nodes,
            total_edges,
            max_depth,
            circular_dependency_count,
            disconnected_nodes,
        }
    }

    /// Return `true` if the graph has no dependency edges.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.total_edges == 0
    }

    /// Return `true` if at least one cycle group exists.
    #[must_use]
    pub const fn has_cycles(&self) -> bool {
        self.circular_dependency_count > 0
    }
}

/// Longest chain of dependency edges below `name`.
///
/// Every top-level call starts from an empty path. Sibling subtrees are
/// measured independently; nothing is memoized, so dense graphs pay for
/// repeated subtrees.
#[must_use]
pub fn dependency_depth(graph: &AgentGraph, name: &str) -> usize {
    let mut on_path: HashSet<&str> = HashSet::new();
    depth_on_path(graph, name, &mut on_path)
}

fn depth_on_path<'g>(
    graph: &'g AgentGraph,
    name: &'g str,
    on_path: &mut HashSet<&'g str>,
) -> usize {
    if !on_path.insert(name) {
        return 0;
    }

    let depth = graph
        .dependencies_of(name)
        .iter()
        .map(|dep| 1 + depth_on_path(graph, dep, on_path))
        .max()
        .unwrap_or(0);

    on_path.remove(name);
    depth
}

/// Mark every name connected to an agent through dependency or dependent
/// edges, seeding a new component from each unmarked agent in turn.
fn connectivity_sweep(graph: &AgentGraph) -> HashSet<&str> {
    let mut marked: HashSet<&str> = HashSet::new();

    for name in graph.names() {
        if marked.contains(name) {
            continue;
        }

        let mut stack: Vec<&str> = vec![name];
        while let Some(current) = stack.pop() {
            if !marked.insert(current) {
                continue;
            }
            stack.extend(graph.dependencies_of(current).iter().map(String::as_str));
            stack.extend(
                graph
                    .edge_pairs()
                    .filter(|(_, to)| *to == current)
                    .map(|(from, _)| from),
            );
        }
    }

    marked
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
