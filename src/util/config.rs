//! Configuration file support for mkbuild.
//!
//! mkbuild reads two configuration file locations:
//! - Global: `~/.mkbuild/config.toml` - User-wide defaults
//! - Project: `.mkbuild/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Command line flags
//! and environment variables are applied on top by the CLI.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Name of the per-project and per-user mkbuild directory.
pub const MKBUILD_DIR: &str = ".mkbuild";

/// Name of the configuration file inside [`MKBUILD_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// What `autogen` does with a dependency identifier it has no rule for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UnknownDependencyPolicy {
    /// Abort before anything is written
    #[default]
    Error,
    /// Log a warning and skip the identifier
    Warn,
}

impl fmt::Display for UnknownDependencyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownDependencyPolicy::Error => write!(f, "error"),
            UnknownDependencyPolicy::Warn => write!(f, "warn"),
        }
    }
}

/// mkbuild configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CMakeLists.txt generation settings
    pub autogen: AutogenConfig,

    /// Container runner settings
    pub docker: DockerConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AutogenConfig {
    /// Policy for unknown dependency identifiers
    pub unknown_dependency: Option<UnknownDependencyPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// Image used when the manifest does not name one
    pub image: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.autogen.unknown_dependency.is_some() {
            self.autogen.unknown_dependency = other.autogen.unknown_dependency;
        }
        if other.docker.image.is_some() {
            self.docker.image = other.docker.image;
        }
    }

    /// The configured unknown-dependency policy, or the default.
    pub fn unknown_dependency(&self) -> UnknownDependencyPolicy {
        self.autogen.unknown_dependency.unwrap_or_default()
    }
}

/// Get the global config directory (~/.mkbuild).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(MKBUILD_DIR))
}

/// Get the global config file path (~/.mkbuild/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Get the project config file path.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(MKBUILD_DIR).join(CONFIG_FILE)
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.mkbuild/config.toml)
/// 2. Global config (~/.mkbuild/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            tracing::debug!("loading global config from {}", global_path.display());
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        tracing::debug!("loading project config from {}", project_path.display());
        config.merge(Config::load_or_default(project_path));
    }

    config
}
