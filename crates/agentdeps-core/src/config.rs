use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::render::{RenderFormat, RenderOptions};
use crate::report::{ResolveOptions, SummaryFormat};

/// Relative location of the project config under a project root.
pub const PROJECT_CONFIG_PATH: &str = ".agentdeps/config.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub resolve: ResolveConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub format: RenderFormat,
    #[serde(default)]
    pub max_depth: usize,
    #[serde(default)]
    pub include_versions: bool,
    #[serde(default)]
    pub highlight_cycles: bool,
}

impl RenderConfig {
    #[must_use]
    pub const fn options(&self) -> RenderOptions {
        RenderOptions {
            max_depth: self.max_depth,
            include_versions: self.include_versions,
            highlight_cycles: self.highlight_cycles,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolveConfig {
    #[serde(default)]
    pub show_transitive: bool,
    #[serde(default)]
    pub summary_format: SummaryFormat,
}

impl ResolveConfig {
    #[must_use]
    pub const fn options(&self) -> ResolveOptions {
        ResolveOptions {
            show_transitive: self.show_transitive,
            summary_format: self.summary_format,
        }
    }
}

/// Load an [`EngineConfig`] from `path`, falling back to defaults when the
/// file does not exist.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or is not valid TOML for
/// this schema (including unknown format names).
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(EngineConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<EngineConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load `<project_root>/.agentdeps/config.toml`.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_project_config(project_root: &Path) -> Result<EngineConfig> {
    load_config(&project_root.join(PROJECT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_config_uses_defaults() {
        let root = tempfile::tempdir().expect("temp dir must be created");
        let cfg = load_project_config(root.path()).expect("load should succeed");

        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.render.format, RenderFormat::Text);
        assert_eq!(cfg.render.max_depth, 0);
        assert_eq!(cfg.resolve.summary_format, SummaryFormat::List);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(root.path().join(".agentdeps")).expect("create config dir");
        std::fs::write(
            root.path().join(PROJECT_CONFIG_PATH),
            r#"
[render]
format = "graphviz"
include_versions = true

[resolve]
summary_format = "tree"
"#,
        )
        .expect("write config");

        let cfg = load_project_config(root.path()).expect("parse");
        assert_eq!(cfg.render.format, RenderFormat::Graphviz);
        assert!(cfg.render.include_versions);
        assert!(!cfg.render.highlight_cycles);
        assert_eq!(cfg.resolve.summary_format, SummaryFormat::Tree);
        assert!(!cfg.resolve.show_transitive);

        let options = cfg.render.options();
        assert_eq!(options.max_depth, 0);
        assert!(options.include_versions);
    }

    #[test]
    fn malformed_config_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[render]\nformat = \"xml\"\n").expect("write config");

        let err = load_config(&path).expect_err("unknown format must fail");
        assert!(err.to_string().contains("Failed to parse"));
        assert!(err.to_string().contains("config.toml"));
    }
}
