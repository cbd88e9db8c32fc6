//! High-level operations.
//!
//! This module contains the implementation of mkbuild commands.

pub mod autogen;
pub mod docker;

pub use autogen::{autogen, generate, AutogenError, AutogenOptions, AutogenReport};
pub use docker::{docker, BuildType, DockerError, DockerOptions, RunnerScript};
