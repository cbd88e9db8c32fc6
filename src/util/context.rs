//! Global context for mkbuild operations.
//!
//! Provides centralized access to the project directory, the paths derived
//! from it and the merged configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cmake::CMAKELISTS;
use crate::core::manifest::MANIFEST_NAME;
use crate::util::config::{self, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Project directory holding the manifest
    cwd: PathBuf,

    /// Global config file, if a home directory is known
    global_config: Option<PathBuf>,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific project directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            global_config: config::global_config_path(),
        }
    }

    /// Create a GlobalContext for a directory given on the command line,
    /// resolved to an absolute path.
    pub fn with_directory(dir: &Path) -> Result<Self> {
        let cwd = std::fs::canonicalize(dir)
            .with_context(|| format!("failed to resolve directory: {}", dir.display()))?;
        Ok(Self::with_cwd(cwd))
    }

    /// Override the global config file location.
    pub fn with_global_config(mut self, path: Option<PathBuf>) -> Self {
        self.global_config = path;
        self
    }

    /// Get the project directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the manifest path.
    pub fn manifest_path(&self) -> PathBuf {
        self.cwd.join(MANIFEST_NAME)
    }

    /// Get the generated CMakeLists.txt path.
    pub fn cmakelists_path(&self) -> PathBuf {
        self.cwd.join(CMAKELISTS)
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        config::project_config_path(&self.cwd)
    }

    /// Get the global configuration file path.
    pub fn global_config_path(&self) -> Option<&Path> {
        self.global_config.as_deref()
    }

    /// Load the merged global and project configuration.
    pub fn config(&self) -> Config {
        config::load_config(self.global_config_path(), &self.project_config_path())
    }
}
