//! Agent dependency graph and the queries that run over it.
//!
//! # Overview
//!
//! The discovery layer hands over parsed agent records. This module turns
//! them into an adjacency map and answers ordering, closure, cycle, and
//! statistics queries against that immutable snapshot.
//!
//! ## Pipeline
//!
//! ```text
//! DiscoveryBatch { agents, failed }
//!        ↓  build::AgentGraph::from_records()
//! AgentGraph (name → node, name → ordered deps; cycles and dangling edges allowed)
//!        ├─ resolve:  resolve_dependencies() / transitive_deps()
//!        ├─ cycles:   detect_cycles() / cycle_groups()
//!        └─ stats:    GraphSummary::from_graph()
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use agentdeps_core::graph::AgentGraph;
//! use agentdeps_core::record::AgentNode;
//!
//! let graph = AgentGraph::from_records(vec![
//!     AgentNode::new("deploy").with_dependencies(["build"]),
//!     AgentNode::new("build").with_dependencies(["lint"]),
//!     AgentNode::new("lint"),
//! ]);
//!
//! let order: Vec<&str> = graph
//!     .resolve_dependencies("deploy")?
//!     .iter()
//!     .map(|node| node.name.as_str())
//!     .collect();
//! assert_eq!(order, ["lint", "build", "deploy"]);
//! # Ok::<(), agentdeps_core::error::GraphError>(())
//! ```

pub mod build;
pub mod cycles;
pub mod resolve;
pub mod stats;

// Re-export primary types at module level for convenience.
pub use build::{AgentGraph, DanglingDependency};
pub use cycles::{Cycle, cycle_groups, detect_cycles, find_cycle_from, has_cycles};
pub use stats::{GraphSummary, dependency_depth};
