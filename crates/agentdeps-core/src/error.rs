use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    AgentNotFound,
    CircularDependency,
    UnsupportedFormat,
    InvalidRecord,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::AgentNotFound => "E2001",
            Self::CircularDependency => "E2003",
            Self::UnsupportedFormat => "E2005",
            Self::InvalidRecord => "E2006",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::AgentNotFound => "Agent not found",
            Self::CircularDependency => "Circular dependency",
            Self::UnsupportedFormat => "Unsupported output format",
            Self::InvalidRecord => "Invalid agent record",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .agentdeps/config.toml and retry."),
            Self::AgentNotFound => {
                Some("Check the agent name, or run `agentdeps check` to list dangling dependencies.")
            }
            Self::CircularDependency => {
                Some("Remove one dependency on the reported cycle to keep the graph acyclic.")
            }
            Self::UnsupportedFormat => {
                Some("Graph formats: text, json, graphviz. Summary formats: list, tree, json.")
            }
            Self::InvalidRecord => Some("Every agent record needs a non-empty name."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors produced by graph queries and rendering.
///
/// Every variant is scoped to the query that raised it; the graph snapshot
/// stays valid for further queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A requested agent, or a dependency reached during resolution, has no
    /// node in the graph.
    #[error("{}", not_found_message(.name, .required_by.as_deref()))]
    NotFound {
        name: String,
        required_by: Option<String>,
    },

    /// A back-edge was found while walking a cycle-intolerant query.
    #[error("circular dependency detected involving agent {agent:?}: {}", .cycle.join(" -> "))]
    CircularDependency { agent: String, cycle: Vec<String> },

    /// A render or summary format name that is not recognized.
    #[error("unsupported format: {format:?}")]
    UnsupportedFormat { format: String },

    /// An agent record without a name.
    #[error("agent name is empty")]
    EmptyName,

    /// The JSON payload could not be encoded.
    #[error("failed to encode graph payload: {message}")]
    Encode { message: String },
}

impl GraphError {
    /// Shorthand for a lookup miss on a top-level query.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            name: name.into(),
            required_by: None,
        }
    }

    /// The machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::AgentNotFound,
            Self::CircularDependency { .. } => ErrorCode::CircularDependency,
            Self::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            Self::EmptyName => ErrorCode::InvalidRecord,
            Self::Encode { .. } => ErrorCode::InternalUnexpected,
        }
    }
}

fn not_found_message(name: &str, required_by: Option<&str>) -> String {
    match required_by {
        Some(parent) => format!("agent {name:?} not found in graph (required by {parent:?})"),
        None => format!("agent {name:?} not found in graph"),
    }
}
