//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.restore-graph/config.toml` - User-wide defaults
//! - Project: `.restore-graph/config.toml` next to `Restore.toml`
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::fs;

/// File name of the restore output written next to a project's output path.
pub const DEFAULT_ASSETS_FILE_NAME: &str = "project.assets.json";

/// Engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Restore settings
    pub restore: RestoreConfig,

    /// Reference graph settings
    pub graph: GraphConfig,
}

/// Restore-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RestoreConfig {
    /// Name of the assets file inside a project's restore output directory
    pub assets_file_name: Option<String>,
}

/// Closure-walk configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GraphConfig {
    /// Log dropped (unresolvable) project references as warnings instead of debug lines
    pub warn_unresolved: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.restore.assets_file_name.is_some() {
            self.restore.assets_file_name = other.restore.assets_file_name;
        }
        if other.graph.warn_unresolved.is_some() {
            self.graph.warn_unresolved = other.graph.warn_unresolved;
        }
    }

    /// The assets file name, falling back to `project.assets.json`.
    pub fn assets_file_name(&self) -> &str {
        self.restore
            .assets_file_name
            .as_deref()
            .unwrap_or(DEFAULT_ASSETS_FILE_NAME)
    }

    /// Whether dropped references should be logged as warnings.
    pub fn warn_unresolved(&self) -> bool {
        self.graph.warn_unresolved.unwrap_or(true)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.restore-graph/config.toml)
/// 2. Global config (~/.restore-graph/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global config directory (~/.restore-graph).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".restore-graph"))
}

/// Get the global config path (~/.restore-graph/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.restore-graph/config.toml).
pub fn project_config_path(solution_root: &Path) -> PathBuf {
    solution_root.join(".restore-graph").join("config.toml")
}
