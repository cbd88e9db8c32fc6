//! Core data structures for mkbuild.
//!
//! This module contains the manifest model consumed by the generator:
//! - Package information (name, dependencies, checks, container settings)
//! - Target and test declarations

pub mod manifest;
pub mod target;

pub use manifest::{ManifestError, PackageInfo, MANIFEST_NAME};
pub use target::{
    BuildInfo, LibraryBuildInfo, ScriptBuildInfo, TargetKind, TargetsInfo, TestInfo,
};
