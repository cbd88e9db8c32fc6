//! Test fixtures for common test scenarios.

use std::path::Path;

use tempfile::TempDir;

use crate::core::manifest::{PackageInfo, MANIFEST_NAME};

/// The smallest useful manifest: one single-header dependency, one executable.
pub const MINIMAL_MANIFEST: &str = r#"name: demo
dependencies:
  - github.com/adishavit/argh
targets:
  executables:
    demo:
      compile: [main.cc]
"#;

/// A manifest exercising every section.
pub const FULL_MANIFEST: &str = r#"schema: 1
name: mkexample
docker: example/builder:latest
docker_tc_disabled: true
dependencies:
  - github.com/curl/curl
  - github.com/catchorg/catch2
  - github.com/measurement-kit/generic-assets
function_checks:
  - name: strlcpy
    define: HAVE_STRLCPY
symbol_checks:
  - name: SO_REUSEPORT
    header: sys/socket.h
    define: HAVE_SO_REUSEPORT
targets:
  libraries:
    mkcore:
      compile: [src/core.cpp, src/util.cpp]
      link: [curl]
      install: true
      headers: [include/mk/core.h]
  executables:
    unit_tests:
      compile: [test/main.cpp]
      link: [mkcore]
    mkcli:
      compile: [src/main.cpp]
      link: [mkcore]
      install: true
  scripts:
    run.sh:
      install: true
tests:
  unit:
    command: unit_tests --quiet
  cli_help:
    command: ["mkcli", "--help"]
"#;

/// A manifest referencing a dependency no rule knows about.
pub const UNKNOWN_DEPENDENCY_MANIFEST: &str = r#"name: demo
dependencies:
  - github.com/adishavit/argh
  - not.a.real/dep
targets:
  executables:
    demo:
      compile: [main.cc]
"#;

/// Parse a fixture manifest, panicking on error.
pub fn package(content: &str) -> PackageInfo {
    PackageInfo::parse(content, Path::new(MANIFEST_NAME)).unwrap()
}

/// A scratch project directory holding a manifest.
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    /// Create a project directory whose MKBuild.yaml is `manifest`.
    pub fn new(manifest: &str) -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(MANIFEST_NAME), manifest).unwrap();
        ProjectFixture { dir }
    }

    /// The project root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Read a file relative to the project root.
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(relative)).unwrap()
    }
}
