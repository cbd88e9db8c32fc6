//! MKBuild.yaml manifest parsing and schema.
//!
//! The manifest is the single source of truth for a package: its name, the
//! dependencies the generator knows how to provision, the targets to build
//! and the tests to register. Unknown fields are rejected and every
//! invariant is checked right after parsing, so emission never has to cope
//! with a half-valid manifest.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::core::target::{TargetKind, TargetsInfo, TestInfo};

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "MKBuild.yaml";

/// Newest manifest schema this version understands.
pub const CURRENT_SCHEMA: u32 = 1;

/// Top-level fields of earlier manifests that mkbuild no longer reads.
const RETIRED_FIELDS: &[&str] = &["amalgamate"];

fn default_schema() -> u32 {
    CURRENT_SCHEMA
}

/// A configure-time check for a function.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionCheck {
    /// Function name
    pub name: String,

    /// Macro defined when the function exists
    pub define: String,
}

/// A configure-time check for a symbol declared by a header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SymbolCheck {
    /// Symbol name
    pub name: String,

    /// Header declaring the symbol
    pub header: String,

    /// Macro defined when the symbol exists
    pub define: String,
}

/// Information on a package, as read from MKBuild.yaml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageInfo {
    /// Manifest schema version
    #[serde(default = "default_schema")]
    pub schema: u32,

    /// Package name, used as the CMake project name
    pub name: String,

    /// Dependency identifiers, in emission order
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Targets to build
    #[serde(default)]
    pub targets: TargetsInfo,

    /// Tests to register, keyed by name
    #[serde(default)]
    pub tests: BTreeMap<String, TestInfo>,

    /// Function checks
    #[serde(default)]
    pub function_checks: Vec<FunctionCheck>,

    /// Symbol checks
    #[serde(default)]
    pub symbol_checks: Vec<SymbolCheck>,

    /// Container image for `mkbuild docker`
    #[serde(default)]
    pub docker: Option<String>,

    /// Skip the artificial network latency inside the container
    #[serde(default)]
    pub docker_tc_disabled: bool,
}

/// A manifest that parsed but violates an invariant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("manifest schema {found} is newer than the supported schema {supported}")]
    UnsupportedSchema { found: u32, supported: u32 },

    #[error("invalid {what} name `{name}`")]
    InvalidName { what: &'static str, name: String },

    #[error("dependency `{0}` is listed more than once")]
    DuplicateDependency(String),

    #[error("target name `{0}` is used more than once")]
    DuplicateTarget(String),

    #[error("{kind} `{name}` has no sources to compile")]
    NoSources { kind: TargetKind, name: String },

    #[error("test `{0}` has an empty command")]
    EmptyTestCommand(String),

    #[error("field `{0}` is no longer supported; remove it from the manifest")]
    RetiredField(&'static str),
}

/// Check whether `name` can be used verbatim as a CMake project, target or
/// test name.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
}

/// Script names are paths relative to the source directory, so they may
/// contain `/` between valid components.
fn is_valid_script_name(name: &str) -> bool {
    name.split('/')
        .all(|part| is_valid_name(part) && part != "." && part != "..")
}

impl PackageInfo {
    /// Load and validate a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse and validate manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if let Some(field) = RETIRED_FIELDS.iter().find(|f| value.get(**f).is_some()) {
            return Err(ManifestError::RetiredField(*field))
                .with_context(|| format!("invalid manifest: {}", path.display()));
        }

        let info: PackageInfo = serde_yaml::from_value(value)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        info.validate()
            .with_context(|| format!("invalid manifest: {}", path.display()))?;

        tracing::debug!(
            "loaded `{}`: {} dependencies, {} tests",
            info.name,
            info.dependencies.len(),
            info.tests.len()
        );

        Ok(info)
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> std::result::Result<(), ManifestError> {
        if self.schema > CURRENT_SCHEMA {
            return Err(ManifestError::UnsupportedSchema {
                found: self.schema,
                supported: CURRENT_SCHEMA,
            });
        }

        if !is_valid_name(&self.name) {
            return Err(ManifestError::InvalidName {
                what: "package",
                name: self.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        for dep in &self.dependencies {
            if !seen.insert(dep.as_str()) {
                return Err(ManifestError::DuplicateDependency(dep.clone()));
            }
        }

        let mut seen = HashSet::new();
        for (kind, name) in self.targets.names() {
            let valid = match kind {
                TargetKind::Script => is_valid_script_name(name),
                _ => is_valid_name(name),
            };
            if !valid {
                return Err(ManifestError::InvalidName {
                    what: kind.as_str(),
                    name: name.to_string(),
                });
            }
            if !seen.insert(name) {
                return Err(ManifestError::DuplicateTarget(name.to_string()));
            }
        }

        for (name, info) in &self.targets.libraries {
            if info.compile.is_empty() {
                return Err(ManifestError::NoSources {
                    kind: TargetKind::Library,
                    name: name.clone(),
                });
            }
        }
        for (name, info) in &self.targets.executables {
            if info.compile.is_empty() {
                return Err(ManifestError::NoSources {
                    kind: TargetKind::Executable,
                    name: name.clone(),
                });
            }
        }

        for (name, test) in &self.tests {
            if !is_valid_name(name) {
                return Err(ManifestError::InvalidName {
                    what: "test",
                    name: name.clone(),
                });
            }
            if test.command.is_empty() {
                return Err(ManifestError::EmptyTestCommand(name.clone()));
            }
        }

        for check in &self.function_checks {
            if !is_valid_name(&check.define) {
                return Err(ManifestError::InvalidName {
                    what: "define",
                    name: check.define.clone(),
                });
            }
        }
        for check in &self.symbol_checks {
            if !is_valid_name(&check.define) {
                return Err(ManifestError::InvalidName {
                    what: "define",
                    name: check.define.clone(),
                });
            }
        }

        Ok(())
    }
}
