//! Manifest loading.
//!
//! A manifest is the already-parsed output of a discovery pass, stored as
//! JSON or YAML:
//!
//! ```yaml
//! agents:
//!   - name: deploy
//!     version: 1.0.0
//!     dependencies: [build]
//!   - name: build
//! failed: 0
//! ```
//!
//! `.yaml` and `.yml` files are read as YAML; everything else as JSON.

use std::path::Path;

use agentdeps_core::record::DiscoveryBatch;
use anyhow::{Context, Result};

/// Read a manifest file into a [`DiscoveryBatch`].
pub fn load_manifest(path: &Path) -> Result<DiscoveryBatch> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;

    let batch = parse_manifest(&content, is_yaml(path))
        .with_context(|| format!("Failed to parse manifest {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        agents = batch.agents.len(),
        failed = batch.failed,
        "loaded manifest"
    );
    Ok(batch)
}

fn parse_manifest(content: &str, yaml: bool) -> Result<DiscoveryBatch> {
    if yaml {
        Ok(serde_yaml::from_str(content)?)
    } else {
        Ok(serde_json::from_str(content)?)
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}
