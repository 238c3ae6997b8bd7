//! `agentdeps resolve`: execution order for one agent.

use std::io::Write;

use agentdeps_core::config::ResolveConfig;
use agentdeps_core::graph::AgentGraph;
use agentdeps_core::report::{ResolutionReport, ResolveOptions, SummaryFormat};
use clap::Args;

use crate::output::{OutputMode, fail, pretty_kv, pretty_section, render_mode};

/// Arguments for `agentdeps resolve`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Agent to resolve.
    pub name: String,

    /// Also list every transitive dependency.
    #[arg(long)]
    pub transitive: bool,

    /// Summary layout: list, tree, or json.
    #[arg(long)]
    pub summary: Option<String>,
}

/// Execute `agentdeps resolve`.
pub fn run_resolve(
    args: &ResolveArgs,
    output: OutputMode,
    graph: &AgentGraph,
    config: &ResolveConfig,
) -> anyhow::Result<()> {
    let options = resolve_options(args, config).map_err(|err| fail(output, err))?;
    let report =
        ResolutionReport::build(graph, &args.name, options).map_err(|err| fail(output, err))?;

    render_mode(output, &report, render_resolve_text, render_resolve_pretty)
}

fn resolve_options(
    args: &ResolveArgs,
    config: &ResolveConfig,
) -> Result<ResolveOptions, agentdeps_core::GraphError> {
    let summary_format = match args.summary.as_deref() {
        Some(raw) => raw.parse::<SummaryFormat>()?,
        None => config.summary_format,
    };

    Ok(ResolveOptions {
        show_transitive: args.transitive || config.show_transitive,
        summary_format,
    })
}

fn render_resolve_text(report: &ResolutionReport, w: &mut dyn Write) -> std::io::Result<()> {
    for dep in &report.dependencies {
        writeln!(
            w,
            "{}\t{}\t{}",
            dep.order,
            dep.name,
            dep.version.as_deref().unwrap_or("-")
        )?;
    }
    if let Some(transitive) = &report.transitive_dependencies {
        for name in transitive {
            writeln!(w, "transitive\t{name}")?;
        }
    }
    Ok(())
}

fn render_resolve_pretty(report: &ResolutionReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Resolution: {}", report.agent_name))?;
    write!(w, "{}", report.summary)?;
    if !report.summary.ends_with('\n') {
        writeln!(w)?;
    }

    if let Some(transitive) = &report.transitive_dependencies {
        writeln!(w)?;
        pretty_kv(
            w,
            "Transitive",
            if transitive.is_empty() {
                "(none)".to_string()
            } else {
                transitive.join(", ")
            },
        )?;
    }
    Ok(())
}
