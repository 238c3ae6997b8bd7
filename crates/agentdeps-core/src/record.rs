//! Agent records as handed over by the discovery layer.
//!
//! Records arrive already parsed. The engine never reads agent source files;
//! it only sees the successfully parsed subset plus a count of the ones that
//! failed upstream.

use serde::{Deserialize, Serialize};

/// One agent definition: a unique name, an optional free-form version, and
/// the names it depends on in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgentNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl AgentNode {
    /// Create a node with no version and no dependencies.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            dependencies: Vec::new(),
        }
    }

    /// Set the version string. Empty strings are treated as absent.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        self.version = (!version.is_empty()).then_some(version);
        self
    }

    /// Append dependency names, keeping their order.
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.extend(deps.into_iter().map(Into::into));
        self
    }

    /// The version if present and non-empty.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref().filter(|v| !v.is_empty())
    }
}

/// The output of one discovery pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiscoveryBatch {
    /// Successfully parsed records, in discovery order.
    #[serde(default, alias = "records")]
    pub agents: Vec<AgentNode>,
    /// Number of records the discovery layer failed to parse.
    #[serde(default)]
    pub failed: usize,
}

impl DiscoveryBatch {
    #[must_use]
    pub const fn new(agents: Vec<AgentNode>, failed: usize) -> Self {
        Self { agents, failed }
    }
}

impl From<Vec<AgentNode>> for DiscoveryBatch {
    fn from(agents: Vec<AgentNode>) -> Self {
        Self::new(agents, 0)
    }
}
