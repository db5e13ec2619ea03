//! Global context for CLI operations.
//!
//! Provides centralized access to configuration, paths, and environment.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::util::config::{self, Config};

/// File name of the nomination snapshot describing a solution's projects.
pub const SOLUTION_FILE_NAME: &str = "Restore.toml";

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global data (~/.restore-graph/)
    home: Option<PathBuf>,

    /// Whether to use verbose output
    verbose: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        Ok(GlobalContext {
            cwd,
            home: config::global_config_dir(),
            verbose: false,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the global home directory, if the platform has one.
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Find `Restore.toml` starting from cwd and searching upward.
    pub fn find_solution(&self) -> Result<PathBuf> {
        let mut current = self.cwd.clone();
        loop {
            let candidate = current.join(SOLUTION_FILE_NAME);
            if candidate.is_file() {
                return Ok(candidate);
            }
            if !current.pop() {
                bail!(
                    "could not find {} in {} or any parent directory\n\
                     help: pass `--solution <path>` or run from inside a solution",
                    SOLUTION_FILE_NAME,
                    self.cwd.display()
                );
            }
        }
    }

    /// Resolve an explicit solution path against cwd, or search for one.
    pub fn solution_path(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) if path.is_absolute() => Ok(path.to_path_buf()),
            Some(path) => Ok(self.cwd.join(path)),
            None => self.find_solution(),
        }
    }

    /// Load merged global and project configuration for a solution file.
    pub fn load_config(&self, solution_path: &Path) -> Config {
        let root = solution_path.parent().unwrap_or(Path::new("."));
        let global = self.home.as_ref().map(|h| h.join("config.toml"));
        config::load_config(global.as_deref(), &config::project_config_path(root))
    }
}
