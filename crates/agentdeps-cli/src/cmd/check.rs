//! `agentdeps check`: integrity findings for the loaded graph.
//!
//! Lists dangling dependencies and the upstream discovery failure count.
//! Findings are reported, never turned into a failing exit status.

use std::io::Write;

use agentdeps_core::graph::{AgentGraph, DanglingDependency, GraphSummary};
use clap::Args;
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `agentdeps check`.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {}

#[derive(Debug, Serialize)]
struct CheckOutput {
    ok: bool,
    content_hash: String,
    summary: GraphSummary,
    dangling: Vec<DanglingDependency>,
    discovery_failures: usize,
}

impl CheckOutput {
    fn from_graph(graph: &AgentGraph) -> Self {
        let dangling = graph.dangling_dependencies();
        let discovery_failures = graph.discovery_failures();
        Self {
            ok: dangling.is_empty() && discovery_failures == 0,
            content_hash: graph.content_hash(),
            summary: GraphSummary::from_graph(graph),
            dangling,
            discovery_failures,
        }
    }
}

/// Execute `agentdeps check`.
pub fn run_check(_args: &CheckArgs, output: OutputMode, graph: &AgentGraph) -> anyhow::Result<()> {
    let payload = CheckOutput::from_graph(graph);
    if !payload.ok {
        tracing::info!(
            dangling = payload.dangling.len(),
            failed = payload.discovery_failures,
            "graph has integrity findings"
        );
    }

    render_mode(output, &payload, render_check_text, render_check_human)
}

fn render_check_text(payload: &CheckOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for dep in &payload.dangling {
        writeln!(w, "dangling\t{}\t{}", dep.from, dep.to)?;
    }
    if payload.discovery_failures > 0 {
        writeln!(w, "failed\t{}", payload.discovery_failures)?;
    }
    if payload.ok {
        writeln!(w, "ok")?;
    }
    Ok(())
}

fn render_check_human(payload: &CheckOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Graph check")?;
    pretty_kv(w, "Agents", payload.summary.total_nodes.to_string())?;
    pretty_kv(w, "Edges", payload.summary.total_edges.to_string())?;
    pretty_kv(w, "Hash", &payload.content_hash)?;
    pretty_kv(w, "Failed", payload.discovery_failures.to_string())?;

    if payload.dangling.is_empty() {
        writeln!(w, "\nNo dangling dependencies.")?;
    } else {
        writeln!(w, "\nDangling dependencies ({})", payload.dangling.len())?;
        for dep in &payload.dangling {
            writeln!(w, "  {} -> {} (missing)", dep.from, dep.to)?;
        }
    }

    Ok(())
}
