//! Test utilities for mkbuild unit tests.
//!
//! Provides manifest fixtures and a scratch project directory so tests can
//! drive the generator end to end without touching the working directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use mkbuild::test_support::{ProjectFixture, MINIMAL_MANIFEST};
//!
//! #[test]
//! fn test_example() {
//!     let project = ProjectFixture::new(MINIMAL_MANIFEST);
//!     // project.path() contains MKBuild.yaml
//! }
//! ```

pub mod fixtures;

pub use fixtures::*;
