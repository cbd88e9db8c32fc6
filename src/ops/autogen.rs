//! Implementation of `mkbuild autogen`.
//!
//! Turns a manifest into CMakeLists.txt. Sections are emitted in a fixed
//! order: preamble, one section per dependency (manifest order), the
//! configuration checks, the compiler hardening block, libraries,
//! executables and scripts (each sorted by name), then tests (sorted). The
//! whole file is built in memory and written once at the end, so a failing
//! run never touches an existing CMakeLists.txt.

use std::path::PathBuf;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::cmake::CMakeFile;
use crate::core::manifest::PackageInfo;
use crate::rules::{self, Rule, RuleError};
use crate::util::config::UnknownDependencyPolicy;
use crate::util::context::GlobalContext;
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::hash::sha256_file;

/// Options for the autogen command.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutogenOptions {
    /// What to do with identifiers no rule matches
    pub unknown_dependency: UnknownDependencyPolicy,
}

/// Error while turning dependencies into CMake.
#[derive(Debug, Error)]
pub enum AutogenError {
    #[error("unknown dependency `{name}`")]
    UnknownDependency {
        name: String,
        suggestions: Vec<&'static str>,
    },

    #[error("rule for `{id}` is invalid")]
    InvalidRule {
        id: &'static str,
        #[source]
        source: RuleError,
    },
}

impl AutogenError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            AutogenError::UnknownDependency { name, suggestions } => {
                let mut diag = Diagnostic::error(format!("unknown dependency `{}`", name))
                    .with_context("dependency identifiers are matched exactly");
                for known in suggestions {
                    diag = diag.with_suggestion(format!("did you mean `{}`?", known));
                }
                diag.with_suggestion(suggestions::UNKNOWN_DEPENDENCY)
            }
            AutogenError::InvalidRule { id, source } => {
                Diagnostic::error(format!("rule for `{}` is invalid", id))
                    .with_context(source.to_string())
            }
        }
    }
}

/// Dependencies split into those with a rule and those skipped.
#[derive(Debug, Default)]
pub struct ResolvedDependencies {
    /// Rules to apply, in manifest order
    pub rules: Vec<&'static Rule>,

    /// Identifiers skipped under [`UnknownDependencyPolicy::Warn`]
    pub skipped: Vec<String>,
}

/// Look up every identifier before anything is emitted.
pub fn resolve_dependencies(
    dependencies: &[String],
    policy: UnknownDependencyPolicy,
) -> Result<ResolvedDependencies, AutogenError> {
    let mut resolved = ResolvedDependencies::default();

    for name in dependencies {
        match rules::lookup(name) {
            Some(rule) => resolved.rules.push(rule),
            None => match policy {
                UnknownDependencyPolicy::Error => {
                    return Err(AutogenError::UnknownDependency {
                        name: name.clone(),
                        suggestions: rules::suggest(name),
                    });
                }
                UnknownDependencyPolicy::Warn => {
                    tracing::warn!("skipping unknown dependency `{}`", name);
                    resolved.skipped.push(name.clone());
                }
            },
        }
    }

    Ok(resolved)
}

/// Generated CMakeLists.txt, not yet written.
#[derive(Debug)]
pub struct Generated {
    pub cmake: CMakeFile,

    /// Identifiers that produced a section, in order
    pub dependencies: Vec<&'static str>,

    /// Identifiers skipped as unknown
    pub skipped: Vec<String>,
}

/// Build the CMakeLists.txt for `pkg` in memory.
pub fn generate(pkg: &PackageInfo, opts: &AutogenOptions) -> Result<Generated> {
    let resolved = resolve_dependencies(&pkg.dependencies, opts.unknown_dependency)?;

    let mut cmake = CMakeFile::open(&pkg.name);

    for rule in &resolved.rules {
        if let Some(instead) = rule.deprecated_by {
            tracing::warn!("`{}` is deprecated; use `{}` instead", rule.id, instead);
        }
        for download in rule.kind.downloads() {
            download
                .validate()
                .map_err(|source| AutogenError::InvalidRule {
                    id: rule.id,
                    source,
                })?;
        }
        cmake
            .apply_rule(rule)
            .with_context(|| format!("failed to emit dependency `{}`", rule.id))?;
        tracing::info!("Resolved {}", rule.id);
    }

    cmake.add_configuration_checks(&pkg.function_checks, &pkg.symbol_checks)?;
    cmake.set_restrictive_compiler_flags()?;
    cmake.finalize_compiler();

    for (name, info) in &pkg.targets.libraries {
        cmake.add_library_target(name, info);
    }
    for (name, info) in &pkg.targets.executables {
        cmake.add_executable_target(name, info);
    }
    for (name, info) in &pkg.targets.scripts {
        cmake.add_script_target(name, info);
    }
    for (name, test) in &pkg.tests {
        cmake.add_test(name, &test.command);
    }

    Ok(Generated {
        cmake,
        dependencies: resolved.rules.iter().map(|rule| rule.id).collect(),
        skipped: resolved.skipped,
    })
}

/// Result of a successful autogen run.
#[derive(Debug, Clone)]
pub struct AutogenReport {
    /// Written CMakeLists.txt
    pub path: PathBuf,

    /// Identifiers that produced a section, in order
    pub dependencies: Vec<&'static str>,

    /// Identifiers skipped as unknown
    pub skipped: Vec<String>,

    /// SHA256 of the written file
    pub fingerprint: String,

    /// Whether the content differs from the previous file
    pub changed: bool,
}

/// Read the manifest in the context directory and write CMakeLists.txt.
pub fn autogen(ctx: &GlobalContext, opts: &AutogenOptions) -> Result<AutogenReport> {
    let manifest_path = ctx.manifest_path();
    if !manifest_path.exists() {
        anyhow::bail!(
            "could not find {} in {}\n{}",
            crate::core::manifest::MANIFEST_NAME,
            ctx.cwd().display(),
            suggestions::NO_MANIFEST
        );
    }
    let pkg = PackageInfo::load(&manifest_path)?;

    let generated = generate(&pkg, opts)?;
    let fingerprint = generated.cmake.fingerprint();

    let path = ctx.cmakelists_path();
    let changed = match sha256_file(&path) {
        Ok(previous) => previous != fingerprint,
        Err(_) => true,
    };
    if !changed {
        tracing::debug!("{} is up to date", path.display());
    }

    generated.cmake.close(&path)?;

    Ok(AutogenReport {
        path,
        dependencies: generated.dependencies,
        skipped: generated.skipped,
        fingerprint,
        changed,
    })
}
