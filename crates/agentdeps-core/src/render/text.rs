//! Indented text tree.
//!
//! Agents are walked in name order. Each agent not yet printed starts a new
//! root block; its dependencies follow in declaration order. One visited set
//! spans the whole pass, so a node reached a second time (through a cycle or
//! simply as a shared dependency) prints as `name (circular)` and is not
//! expanded again.
//!
//! The walk recurses once per tree level. Chains deeper than a few thousand
//! agents should be rendered with a `max_depth` bound, or as JSON or DOT,
//! which do not recurse.

use std::collections::HashSet;
use std::fmt::Write as FmtWrite;

use crate::graph::AgentGraph;

/// Render `graph` as a text tree.
///
/// `max_depth` of 0 means unlimited; otherwise nodes at that depth and below
/// are omitted (roots are depth 0). With `include_versions`, a node with a
/// version prints as `name (version)`.
#[must_use]
pub fn render_text(graph: &AgentGraph, max_depth: usize, include_versions: bool) -> String {
    let mut out = String::new();
    let mut visited: HashSet<&str> = HashSet::new();

    for name in graph.names() {
        if visited.contains(name) {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }

        let mut tree = TreeWriter {
            graph,
            max_depth,
            include_versions,
            visited: &mut visited,
            out: &mut out,
        };
        tree.node(name, "", None, 0);
    }

    out
}

struct TreeWriter<'g, 'a> {
    graph: &'g AgentGraph,
    max_depth: usize,
    include_versions: bool,
    visited: &'a mut HashSet<&'g str>,
    out: &'a mut String,
}

impl<'g> TreeWriter<'g, '_> {
    /// `is_last` is `None` for a root, which prints without a connector.
    fn node(&mut self, name: &'g str, prefix: &str, is_last: Option<bool>, depth: usize) {
        if self.max_depth > 0 && depth >= self.max_depth {
            return;
        }

        let (connector, child_prefix) = match is_last {
            None => (String::new(), String::new()),
            Some(true) => (format!("{prefix}└── "), format!("{prefix}    ")),
            Some(false) => (format!("{prefix}├── "), format!("{prefix}│   ")),
        };

        if !self.visited.insert(name) {
            let _ = writeln!(self.out, "{connector}{name} (circular)");
            return;
        }

        let version = if self.include_versions {
            self.graph
                .agent(name)
                .and_then(|node| node.version())
                .map(|v| format!(" ({v})"))
                .unwrap_or_default()
        } else {
            String::new()
        };
        let _ = writeln!(self.out, "{connector}{name}{version}");

        let graph = self.graph;
        let deps = graph.dependencies_of(name);
        for (i, dep) in deps.iter().enumerate() {
            self.node(dep, &child_prefix, Some(i + 1 == deps.len()), depth + 1);
        }
    }
}
