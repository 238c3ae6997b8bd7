//! Graphviz DOT output.

use std::fmt::Write as FmtWrite;

use crate::graph::AgentGraph;

/// Render `graph` as a `digraph`.
///
/// Node labels carry `name\nversion` when `include_versions` is set and the
/// agent has a version; otherwise just the name. Edges point from the
/// dependent to its dependency.
#[must_use]
pub fn render_graphviz(graph: &AgentGraph, include_versions: bool) -> String {
    let mut out = String::from("digraph {\n");

    for node in graph.agents() {
        let name = escape(&node.name);
        match node.version().filter(|_| include_versions) {
            Some(version) => {
                let _ = writeln!(
                    out,
                    "  \"{name}\" [label=\"{name}\\n{}\"];",
                    escape(version)
                );
            }
            None => {
                let _ = writeln!(out, "  \"{name}\" [label=\"{name}\"];");
            }
        }
    }

    for (from, to) in graph.edge_pairs() {
        let _ = writeln!(out, "  \"{}\" -> \"{}\";", escape(from), escape(to));
    }

    out.push_str("}\n");
    out
}

/// Escape a string for use inside a double-quoted DOT ID.
fn escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}
