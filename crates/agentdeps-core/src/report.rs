//! Per-agent resolution report.
//!
//! Bundles the execution order for one agent with an optional transitive
//! closure and a short human summary, ready to hand to an output sink.

use std::fmt::{self, Write as FmtWrite};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::GraphError;
use crate::graph::AgentGraph;

/// Layout of [`ResolutionReport::summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryFormat {
    /// Numbered execution order, excluding the target.
    #[default]
    List,
    /// The target with one branch line per dependency.
    Tree,
    /// A one-line count; the structured fields carry the data.
    Json,
}

impl SummaryFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Tree => "tree",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for SummaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryFormat {
    type Err = GraphError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "list" => Ok(Self::List),
            "tree" => Ok(Self::Tree),
            "json" => Ok(Self::Json),
            _ => Err(GraphError::UnsupportedFormat {
                format: raw.to_string(),
            }),
        }
    }
}

/// Knobs for [`ResolutionReport::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolveOptions {
    #[serde(default)]
    pub show_transitive: bool,
    #[serde(default)]
    pub summary_format: SummaryFormat,
}

/// One entry of the execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// 1-based position in the execution order.
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub agent_name: String,
    /// Execution order; the last entry is the agent itself.
    pub dependencies: Vec<DependencyInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transitive_dependencies: Option<Vec<String>>,
    pub summary: String,
}

impl ResolutionReport {
    /// Resolve `agent_name` and describe the result.
    ///
    /// # Errors
    ///
    /// Propagates [`GraphError::NotFound`] and
    /// [`GraphError::CircularDependency`] from resolution.
    #[instrument(skip(graph))]
    pub fn build(
        graph: &AgentGraph,
        agent_name: &str,
        options: ResolveOptions,
    ) -> Result<Self, GraphError> {
        let dependencies: Vec<DependencyInfo> = graph
            .resolve_dependencies(agent_name)?
            .into_iter()
            .enumerate()
            .map(|(idx, node)| DependencyInfo {
                name: node.name.clone(),
                version: node.version().map(str::to_string),
                order: idx + 1,
            })
            .collect();

        let transitive_dependencies = if options.show_transitive {
            Some(graph.transitive_deps(agent_name)?)
        } else {
            None
        };

        let summary = format_summary(options.summary_format, agent_name, &dependencies);

        Ok(Self {
            agent_name: agent_name.to_string(),
            dependencies,
            transitive_dependencies,
            summary,
        })
    }
}

fn format_summary(format: SummaryFormat, agent_name: &str, deps: &[DependencyInfo]) -> String {
    let upstream = deps.iter().filter(|dep| dep.name != agent_name);
    let mut out = String::new();

    match format {
        SummaryFormat::Tree => {
            let _ = writeln!(out, "{agent_name}");
            for dep in upstream {
                let _ = write!(out, "  └─ {}", dep.name);
                if let Some(version) = &dep.version {
                    let _ = write!(out, " (v{version})");
                }
                out.push('\n');
            }
        }
        SummaryFormat::List => {
            let _ = writeln!(out, "Dependencies for {agent_name} (execution order):");
            for dep in upstream {
                let _ = write!(out, "{}. {}", dep.order, dep.name);
                if let Some(version) = &dep.version {
                    let _ = write!(out, " v{version}");
                }
                out.push('\n');
            }
        }
        SummaryFormat::Json => {
            let _ = write!(
                out,
                "Resolved {} dependencies for agent {agent_name:?}",
                upstream.count()
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AgentNode;

    fn sample() -> AgentGraph {
        AgentGraph::from_records(vec![
            AgentNode::new("deploy").with_dependencies(["build", "notify"]),
            AgentNode::new("build")
                .with_version("1.4.0")
                .with_dependencies(["lint"]),
            AgentNode::new("lint"),
            AgentNode::new("notify").with_version("0.2.0"),
        ])
    }

    #[test]
    fn report_orders_and_numbers_dependencies() {
        let report =
            ResolutionReport::build(&sample(), "deploy", ResolveOptions::default()).expect("report");

        let names: Vec<&str> = report.dependencies.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["lint", "build", "notify", "deploy"]);
        assert_eq!(report.dependencies[0].order, 1);
        assert_eq!(report.dependencies[3].order, 4);
        assert_eq!(report.dependencies[1].version.as_deref(), Some("1.4.0"));
        assert!(report.transitive_dependencies.is_none());
    }

    #[test]
    fn list_summary() {
        let report =
            ResolutionReport::build(&sample(), "deploy", ResolveOptions::default()).expect("report");
        assert_eq!(
            report.summary,
            "Dependencies for deploy (execution order):\n1. lint\n2. build v1.4.0\n3. notify v0.2.0\n"
        );
    }

    #[test]
    fn tree_summary() {
        let options = ResolveOptions {
            summary_format: SummaryFormat::Tree,
            ..ResolveOptions::default()
        };
        let report = ResolutionReport::build(&sample(), "deploy", options).expect("report");
        assert_eq!(
            report.summary,
            "deploy\n  └─ lint\n  └─ build (v1.4.0)\n  └─ notify (v0.2.0)\n"
        );
    }

    #[test]
    fn json_summary_counts_upstream() {
        let options = ResolveOptions {
            show_transitive: true,
            summary_format: SummaryFormat::Json,
        };
        let report = ResolutionReport::build(&sample(), "deploy", options).expect("report");
        assert_eq!(report.summary, "Resolved 3 dependencies for agent \"deploy\"");
        assert_eq!(
            report.transitive_dependencies,
            Some(vec![
                "build".to_string(),
                "lint".to_string(),
                "notify".to_string()
            ])
        );
    }

    #[test]
    fn summary_format_parse() {
        assert_eq!("tree".parse::<SummaryFormat>(), Ok(SummaryFormat::Tree));
        assert_eq!("".parse::<SummaryFormat>(), Ok(SummaryFormat::List));
        assert!(matches!(
            "yaml".parse::<SummaryFormat>(),
            Err(GraphError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn resolution_errors_propagate() {
        let graph = AgentGraph::from_records(vec![
            AgentNode::new("a").with_dependencies(["b"]),
            AgentNode::new("b").with_dependencies(["a"]),
        ]);
        assert!(matches!(
            ResolutionReport::build(&graph, "a", ResolveOptions::default()),
            Err(GraphError::CircularDependency { .. })
        ));
        assert_eq!(
            ResolutionReport::build(&graph, "zzz", ResolveOptions::default()),
            Err(GraphError::not_found("zzz"))
        );
    }
}
