//! Command implementations

pub mod autogen;
pub mod docker;
