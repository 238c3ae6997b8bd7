//! Serialized views of a finished graph.
//!
//! Three stateless renderers: an indented text tree ([`text`]), a structured
//! node/edge payload ([`json`]), and Graphviz DOT ([`dot`]). [`render`] picks
//! one by name, attaches the graph summary, and optionally the detected
//! cycle paths.
//!
//! The format name is validated before any rendering work starts, so an
//! unknown name yields [`GraphError::UnsupportedFormat`] and no output.

pub mod dot;
pub mod json;
pub mod text;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::{AgentGraph, Cycle, GraphSummary, detect_cycles};

pub use dot::render_graphviz;
pub use json::{GraphData, GraphEdge, GraphNode, render_json};
pub use text::render_text;

/// Output formats for a graph render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    #[default]
    Text,
    Json,
    Graphviz,
}

impl RenderFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Graphviz => "graphviz",
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderFormat {
    type Err = GraphError;

    /// Case-insensitive. An empty name selects [`RenderFormat::Text`].
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "graphviz" => Ok(Self::Graphviz),
            _ => Err(GraphError::UnsupportedFormat {
                format: raw.to_string(),
            }),
        }
    }
}

/// Options shared by every renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Text tree depth limit; 0 means unlimited.
    #[serde(default)]
    pub max_depth: usize,
    /// Show versions in text and DOT output.
    #[serde(default)]
    pub include_versions: bool,
    /// Attach detected cycle paths to the report.
    #[serde(default)]
    pub highlight_cycles: bool,
}

/// The result of one render call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderReport {
    pub format: RenderFormat,
    /// The rendered text, JSON document, or DOT source.
    pub graph_data: String,
    /// The structured payload behind `graph_data` for the JSON format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_data: Option<GraphData>,
    pub summary: GraphSummary,
    /// Cycle paths, populated when `highlight_cycles` is set.
    pub cycles: Vec<Cycle>,
}

/// Render `graph` in the format named by `format`.
///
/// # Errors
///
/// Returns [`GraphError::UnsupportedFormat`] for an unknown format name,
/// before any output is produced.
pub fn render(
    graph: &AgentGraph,
    format: &str,
    options: RenderOptions,
) -> Result<RenderReport, GraphError> {
    let format: RenderFormat = format.parse()?;
    render_as(graph, format, options)
}

/// Render `graph` in an already-validated format.
///
/// # Errors
///
/// Returns [`GraphError::Encode`] if the JSON payload cannot be encoded.
#[instrument(skip(graph))]
pub fn render_as(
    graph: &AgentGraph,
    format: RenderFormat,
    options: RenderOptions,
) -> Result<RenderReport, GraphError> {
    let (graph_data, json_data) = match format {
        RenderFormat::Text => (
            render_text(graph, options.max_depth, options.include_versions),
            None,
        ),
        RenderFormat::Json => {
            let data = GraphData::from_graph(graph);
            let encoded = render_json(&data).map_err(|err| GraphError::Encode {
                message: err.to_string(),
            })?;
            (encoded, Some(data))
        }
        RenderFormat::Graphviz => (render_graphviz(graph, options.include_versions), None),
    };

    let summary = GraphSummary::from_graph(graph);
    let cycles = if options.highlight_cycles {
        detect_cycles(graph)
    } else {
        Vec::new()
    };

    debug!(
        %format,
        bytes = graph_data.len(),
        cycles = cycles.len(),
        "rendered agent graph"
    );

    Ok(RenderReport {
        format,
        graph_data,
        json_data,
        summary,
        cycles,
    })
}
