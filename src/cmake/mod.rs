//! CMakeLists.txt generation.
//!
//! [`CMakeFile`] is the text sink; the submodules extend it with the
//! statements, conditionals, flag blocks and target declarations the
//! generator is written in.

pub mod commands;
pub mod conditional;
pub mod emitter;
pub mod flags;
pub mod targets;

pub use conditional::{Condition, NO_ELSE};
pub use emitter::CMakeFile;

/// Name of the generated file.
pub const CMAKELISTS: &str = "CMakeLists.txt";
