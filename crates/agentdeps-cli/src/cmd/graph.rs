//! `agentdeps graph`: render the whole agent graph.
//!
//! `--render` picks the graph format (text tree, JSON payload, Graphviz
//! DOT); the global output mode decides how the result is framed. Text mode
//! prints the rendered graph verbatim, so `agentdeps graph --render graphviz
//! --format text | dot -Tsvg` works.

use std::io::Write;

use agentdeps_core::config::RenderConfig;
use agentdeps_core::graph::AgentGraph;
use agentdeps_core::render::{RenderFormat, RenderOptions, RenderReport, render_as};
use clap::Args;

use crate::output::{OutputMode, fail, pretty_kv, pretty_rule, pretty_section, render_mode};

/// Arguments for `agentdeps graph`.
#[derive(Args, Debug, Default)]
pub struct GraphArgs {
    /// Graph format: text, json, or graphviz.
    #[arg(long)]
    pub render: Option<String>,

    /// Limit text tree depth (0 = unlimited).
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Show agent versions.
    #[arg(long)]
    pub versions: bool,

    /// Report detected cycle paths.
    #[arg(long)]
    pub cycles: bool,
}

/// Execute `agentdeps graph`.
pub fn run_graph(
    args: &GraphArgs,
    output: OutputMode,
    graph: &AgentGraph,
    config: &RenderConfig,
) -> anyhow::Result<()> {
    let (format, options) = render_settings(args, config).map_err(|err| fail(output, err))?;
    let report = render_as(graph, format, options).map_err(|err| fail(output, err))?;

    render_mode(output, &report, render_graph_text, render_graph_pretty)
}

fn render_settings(
    args: &GraphArgs,
    config: &RenderConfig,
) -> Result<(RenderFormat, RenderOptions), agentdeps_core::GraphError> {
    let format = match args.render.as_deref() {
        Some(raw) => raw.parse::<RenderFormat>()?,
        None => config.format,
    };

    let defaults = config.options();
    let options = RenderOptions {
        max_depth: args.max_depth.unwrap_or(defaults.max_depth),
        include_versions: args.versions || defaults.include_versions,
        highlight_cycles: args.cycles || defaults.highlight_cycles,
    };

    Ok((format, options))
}

fn render_graph_text(report: &RenderReport, w: &mut dyn Write) -> std::io::Result<()> {
    write!(w, "{}", report.graph_data)?;
    if !report.graph_data.is_empty() && !report.graph_data.ends_with('\n') {
        writeln!(w)?;
    }
    Ok(())
}

fn render_graph_pretty(report: &RenderReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Agent graph ({})", report.format))?;
    if report.graph_data.is_empty() {
        writeln!(w, "(no agents)")?;
    } else {
        render_graph_text(report, w)?;
    }
    pretty_rule(w)?;

    let summary = &report.summary;
    pretty_kv(w, "Agents", summary.total_nodes.to_string())?;
    pretty_kv(w, "Edges", summary.total_edges.to_string())?;
    pretty_kv(w, "Max depth", summary.max_depth.to_string())?;
    pretty_kv(w, "Cycles", summary.circular_dependency_count.to_string())?;
    pretty_kv(w, "Disconnected", summary.disconnected_nodes.to_string())?;

    for cycle in &report.cycles {
        writeln!(w, "  cycle: {}", format_cycle(cycle))?;
    }
    Ok(())
}

/// `a -> b -> a` for the cycle `[a, b]`.
pub fn format_cycle(cycle: &[String]) -> String {
    let mut parts: Vec<&str> = cycle.iter().map(String::as_str).collect();
    if let Some(first) = cycle.first() {
        parts.push(first);
    }
    parts.join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdeps_core::record::AgentNode;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: GraphArgs,
    }

    fn sample() -> AgentGraph {
        AgentGraph::from_records(vec![
            AgentNode::new("a").with_dependencies(["b"]),
            AgentNode::new("b").with_dependencies(["a"]),
        ])
    }

    #[test]
    fn graph_args_parse() {
        let parsed = Wrapper::parse_from([
            "test",
            "--render",
            "graphviz",
            "--max-depth",
            "2",
            "--versions",
        ]);
        assert_eq!(parsed.args.render.as_deref(), Some("graphviz"));
        assert_eq!(parsed.args.max_depth, Some(2));
        assert!(parsed.args.versions);
        assert!(!parsed.args.cycles);
    }

    #[test]
    fn config_supplies_defaults() {
        let config = RenderConfig {
            format: RenderFormat::Json,
            max_depth: 4,
            include_versions: true,
            highlight_cycles: false,
        };
        let (format, options) = render_settings(&GraphArgs::default(), &config).expect("settings");

        assert_eq!(format, RenderFormat::Json);
        assert_eq!(options.max_depth, 4);
        assert!(options.include_versions);
    }

    #[test]
    fn unknown_render_format_is_rejected() {
        let args = GraphArgs {
            render: Some("xml".to_string()),
            ..GraphArgs::default()
        };
        assert!(render_settings(&args, &RenderConfig::default()).is_err());
    }

    #[test]
    fn pretty_lists_summary_and_cycles() {
        let options = RenderOptions {
            highlight_cycles: true,
            ..RenderOptions::default()
        };
        let report = render_as(&sample(), RenderFormat::Text, options).expect("render");
        let mut out = Vec::new();
        render_graph_pretty(&report, &mut out).expect("render");

        let rendered = String::from_utf8(out).expect("utf8");
        assert!(rendered.contains("Agent graph (text)"));
        assert!(rendered.contains("a (circular)"));
        assert!(rendered.contains("Cycles:"));
        assert!(rendered.contains("cycle: a -> b -> a"));
    }

    #[test]
    fn format_cycle_closes_loop() {
        assert_eq!(format_cycle(&["a".to_string()]), "a -> a");
        assert_eq!(format_cycle(&[]), "");
    }
}
