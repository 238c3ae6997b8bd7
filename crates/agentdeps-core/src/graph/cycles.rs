//! Cycle detection for the agent dependency graph.
//!
//! # Design
//!
//! - **DFS coloring**: a `visited` set, an `on_path` set for the active DFS
//!   path, and the path itself. Reaching a dependency that is on the path
//!   closes a cycle; the reported cycle is the path slice from that
//!   dependency to the current node. The walk keeps an explicit frame
//!   stack, so long chains do not recurse. Dangling targets have no
//!   dependencies and are simply leaves.
//! - **Re-seeded from every node**: [`detect_cycles`] restarts the search
//!   from each agent with fresh state, so cycles unreachable from earlier
//!   start points are still found. Worst case O(V·(V+E)).
//! - **SCC groups**: [`cycle_groups`] reports strongly connected components
//!   through petgraph's Tarjan implementation, one sorted member list per
//!   group, for callers that want membership rather than a walk order.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashSet;

use petgraph::algo::tarjan_scc;
use tracing::{debug, instrument};

use crate::graph::build::AgentGraph;

/// An ordered list of names forming a loop. The last name depends on the
/// first. A self-loop is a single name.
pub type Cycle = Vec<String>;

/// Find every distinct cycle in the graph.
///
/// Each start node yields at most one cycle (the first back-edge its DFS
/// meets). Cycles that are rotations of one already found are skipped, so
/// `a → b → a` is reported once whether the walk starts at `a` or `b`.
#[instrument(skip_all)]
#[must_use]
pub fn detect_cycles(graph: &AgentGraph) -> Vec<Cycle> {
    let mut cycles: Vec<Cycle> = Vec::new();
    let mut seen: HashSet<Cycle> = HashSet::new();

    for start in graph.names() {
        if let Some(cycle) = find_cycle_from(graph, start) {
            if seen.insert(canonical_rotation(&cycle)) {
                cycles.push(cycle);
            }
        }
    }

    debug!(count = cycles.len(), "cycle detection finished");
    cycles
}

/// Run one DFS from `start` and return the first cycle it closes.
#[must_use]
pub fn find_cycle_from(graph: &AgentGraph, start: &str) -> Option<Cycle> {
    let mut walk = CycleWalk::default();
    walk.visit(graph, start)
}

/// Return `true` if any cycle is reachable from any node.
#[must_use]
pub fn has_cycles(graph: &AgentGraph) -> bool {
    graph
        .names()
        .any(|start| find_cycle_from(graph, start).is_some())
}

/// Strongly connected components that form cycles.
///
/// Each entry is a sorted list of names. Components with two or more
/// members qualify, as do single nodes with a self-loop. Entries are sorted.
#[must_use]
pub fn cycle_groups(graph: &AgentGraph) -> Vec<Vec<String>> {
    let (pg, _) = graph.to_petgraph();

    let mut groups: Vec<Vec<String>> = tarjan_scc(&pg)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .is_some_and(|node| pg.find_edge(*node, *node).is_some())
        })
        .map(|component| {
            let mut names: Vec<String> = component
                .into_iter()
                .filter_map(|idx| pg.node_weight(idx).cloned())
                .collect();
            names.sort_unstable();
            names
        })
        .collect();

    groups.sort_unstable();
    groups
}

#[derive(Default)]
struct CycleWalk<'g> {
    visited: HashSet<&'g str>,
    on_path: HashSet<&'g str>,
    path: Vec<&'g str>,
}

impl<'g> CycleWalk<'g> {
    fn visit(&mut self, graph: &'g AgentGraph, start: &'g str) -> Option<Cycle> {
        // (name, index of the next dependency to try)
        let mut frames: Vec<(&'g str, usize)> = Vec::new();
        self.enter(start);
        frames.push((start, 0));

        while let Some(frame) = frames.last_mut() {
            let (name, next) = *frame;
            frame.1 += 1;

            let Some(dep) = graph.dependencies_of(name).get(next) else {
                frames.pop();
                self.on_path.remove(name);
                self.path.pop();
                continue;
            };

            let dep = dep.as_str();
            if self.on_path.contains(dep) {
                let from = self.path.iter().position(|n| *n == dep).unwrap_or(0);
                return Some(self.path[from..].iter().map(|n| (*n).to_string()).collect());
            }
            if !self.visited.contains(dep) {
                self.enter(dep);
                frames.push((dep, 0));
            }
        }

        None
    }

    fn enter(&mut self, name: &'g str) {
        self.visited.insert(name);
        self.on_path.insert(name);
        self.path.push(name);
    }
}

fn canonical_rotation(cycle: &[String]) -> Cycle {
    let pivot = cycle
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.cmp(b.1))
        .map_or(0, |(idx, _)| idx);

    cycle[pivot..]
        .iter()
        .chain(&cycle[..pivot])
        .cloned()
        .collect()
}
