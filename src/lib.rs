//! mkbuild - generate CMake projects from a declarative C/C++ manifest
//!
//! This crate provides the library functionality behind the `mkbuild` CLI:
//! manifest loading, the dependency rule registry, CMake emission and the
//! containerized test runner.

pub mod cmake;
pub mod core;
pub mod ops;
pub mod rules;
pub mod util;

/// Shared manifest fixtures for unit tests.
#[cfg(test)]
pub mod test_support;

pub use cmake::CMakeFile;
pub use core::manifest::PackageInfo;
pub use rules::Rule;
pub use util::context::GlobalContext;
