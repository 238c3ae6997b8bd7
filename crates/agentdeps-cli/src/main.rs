#![forbid(unsafe_code)]

mod cmd;
mod manifest;
mod output;

use agentdeps_core::config::{EngineConfig, load_config, load_project_config};
use agentdeps_core::graph::AgentGraph;
use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "agentdeps: dependency order and graph reports for agent definitions",
    long_about = None
)]
struct Cli {
    /// Manifest of discovered agents (JSON, or YAML by extension).
    #[arg(long, global = true, default_value = "agents.json")]
    manifest: PathBuf,

    /// Config file. Defaults to `.agentdeps/config.toml` in the current directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }

    fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        match &self.config {
            Some(path) => load_config(path),
            None => load_project_config(&env::current_dir()?),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Resolve execution order for one agent",
        long_about = "Print the agents that must run before NAME, followed by NAME itself.",
        after_help = "EXAMPLES:\n    # Execution order\n    agentdeps resolve deploy\n\n    # Include the transitive closure, tree summary\n    agentdeps resolve deploy --transitive --summary tree\n\n    # Emit machine-readable output\n    agentdeps resolve deploy --format json"
    )]
    Resolve(cmd::resolve::ResolveArgs),

    #[command(
        about = "Render the agent graph",
        long_about = "Render the whole agent graph as a text tree, JSON payload, or Graphviz DOT.",
        after_help = "EXAMPLES:\n    # Text tree with versions\n    agentdeps graph --versions\n\n    # Graphviz source\n    agentdeps graph --render graphviz --format text | dot -Tsvg > agents.svg"
    )]
    Graph(cmd::graph::GraphArgs),

    #[command(
        about = "List dependency cycles",
        after_help = "EXAMPLES:\n    agentdeps cycles\n    agentdeps cycles --format json"
    )]
    Cycles(cmd::cycles::CyclesArgs),

    #[command(
        about = "Check for dangling dependencies",
        long_about = "List dependencies that name no known agent, and the number of records discovery failed to parse.",
        after_help = "EXAMPLES:\n    agentdeps check --manifest agents.yaml"
    )]
    Check(cmd::check::CheckArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("AGENTDEPS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "agentdeps=debug,info"
        } else {
            "agentdeps=info,warn"
        })
    });

    let format = env::var("AGENTDEPS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let output = cli.output_mode();
    let config = cli.engine_config()?;

    let batch = manifest::load_manifest(&cli.manifest)?;
    let graph = AgentGraph::from_records(batch);
    debug!(hash = %graph.content_hash(), "graph ready");

    match cli.command {
        Commands::Resolve(ref args) => {
            cmd::resolve::run_resolve(args, output, &graph, &config.resolve)
        }
        Commands::Graph(ref args) => cmd::graph::run_graph(args, output, &graph, &config.render),
        Commands::Cycles(ref args) => cmd::cycles::run_cycles(args, output, &graph),
        Commands::Check(ref args) => cmd::check::run_check(args, output, &graph),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from([
            "agentdeps",
            "resolve",
            "deploy",
            "--manifest",
            "agents.yaml",
            "--format",
            "json",
        ]);
        assert_eq!(cli.manifest, PathBuf::from("agents.yaml"));
        assert_eq!(cli.format, Some(OutputMode::Json));
        assert!(matches!(cli.command, Commands::Resolve(ref args) if args.name == "deploy"));
    }

    #[test]
    fn manifest_defaults_to_agents_json() {
        let cli = Cli::parse_from(["agentdeps", "check"]);
        assert_eq!(cli.manifest, PathBuf::from("agents.json"));
        assert!(cli.config.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["agentdeps", "--json", "cycles"]);
        assert!(cli.json);
        assert_eq!(cli.output_mode(), OutputMode::Json);
    }

    #[test]
    fn format_flag_wins_over_json() {
        let cli = Cli::parse_from(["agentdeps", "--json", "--format", "text", "cycles"]);
        assert_eq!(cli.output_mode(), OutputMode::Text);
    }

    #[test]
    fn explicit_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.toml");
        let cli = Cli::parse_from([
            "agentdeps",
            "--config",
            path.to_str().expect("utf8 path"),
            "check",
        ]);
        assert_eq!(cli.engine_config().expect("config"), EngineConfig::default());
    }
}
