#![forbid(unsafe_code)]
//! agentdeps-core library.
//!
//! Builds a dependency graph over agent records supplied by the caller and
//! answers questions about it: execution order, transitive closure, cycles,
//! dangling references, summary statistics, and text/JSON/DOT renders.
//!
//! # Conventions
//!
//! - **Errors**: Graph queries return [`error::GraphError`]; config loading
//!   uses `anyhow::Result` with context.
//! - **Logging**: Use `tracing` macros (`debug!`, `warn!`) and `#[instrument]`
//!   on public operations.
//! - **Determinism**: Every listing is ordered by agent name or declaration
//!   order, never by hash iteration order.

pub mod config;
pub mod error;
pub mod graph;
pub mod record;
pub mod render;
pub mod report;

pub use error::{ErrorCode, GraphError};
pub use graph::{AgentGraph, GraphSummary};
pub use record::{AgentNode, DiscoveryBatch};
