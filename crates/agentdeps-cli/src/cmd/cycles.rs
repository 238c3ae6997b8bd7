//! `agentdeps cycles`: list dependency cycles.
//!
//! Reports both the DFS cycle paths and the strongly connected components
//! they belong to. Finding cycles is not an error; the command exits zero.

use std::io::Write;

use agentdeps_core::graph::{AgentGraph, Cycle, cycle_groups, detect_cycles};
use clap::Args;
use serde::Serialize;

use crate::cmd::graph::format_cycle;
use crate::output::{OutputMode, render_mode};

/// Arguments for `agentdeps cycles`.
#[derive(Args, Debug, Default)]
pub struct CyclesArgs {}

#[derive(Debug, Serialize)]
struct CyclesOutput {
    cycles: Vec<Cycle>,
    groups: Vec<Vec<String>>,
}

/// Execute `agentdeps cycles`.
pub fn run_cycles(_args: &CyclesArgs, output: OutputMode, graph: &AgentGraph) -> anyhow::Result<()> {
    let payload = CyclesOutput {
        cycles: detect_cycles(graph),
        groups: cycle_groups(graph),
    };

    render_mode(output, &payload, render_cycles_text, render_cycles_human)
}

fn render_cycles_text(payload: &CyclesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for cycle in &payload.cycles {
        writeln!(w, "{}", format_cycle(cycle))?;
    }
    Ok(())
}

fn render_cycles_human(payload: &CyclesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    if payload.cycles.is_empty() {
        writeln!(w, "No dependency cycles found.")?;
        return Ok(());
    }

    writeln!(w, "Dependency cycles ({})", payload.cycles.len())?;
    for (idx, cycle) in payload.cycles.iter().enumerate() {
        writeln!(w, "\nCycle {}:", idx + 1)?;
        writeln!(w, "  {}", format_cycle(cycle))?;
    }

    writeln!(w, "\nCycle groups ({})", payload.groups.len())?;
    for group in &payload.groups {
        writeln!(w, "  - {}", group.join(", "))?;
    }

    Ok(())
}
