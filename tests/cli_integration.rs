//! CLI integration tests for mkbuild.
//!
//! These tests run the binary against scratch projects and check the files it
//! writes. Nothing here needs CMake or docker.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const ARGH_MANIFEST: &str = r#"name: demo
dependencies:
  - github.com/adishavit/argh
targets:
  executables:
    demo:
      compile: [main.cc]
tests:
  smoke:
    command: demo --help
"#;

const UNKNOWN_MANIFEST: &str = r#"name: demo
dependencies:
  - github.com/adishavit/argh
  - not.a.real/dep
targets:
  executables:
    demo:
      compile: [main.cc]
"#;

/// Get the mkbuild binary command, isolated from the user's configuration.
fn mkbuild(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mkbuild").unwrap();
    cmd.env("HOME", home).env_remove("MKBUILD_UNKNOWN_DEPS");
    cmd
}

/// Create a project directory holding `manifest`.
fn project(manifest: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("MKBuild.yaml"), manifest).unwrap();
    tmp
}

// ============================================================================
// mkbuild autogen
// ============================================================================

#[test]
fn test_autogen_writes_cmakelists() {
    let tmp = project(ARGH_MANIFEST);

    mkbuild(tmp.path())
        .arg("autogen")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated"));

    let cmake = fs::read_to_string(tmp.path().join("CMakeLists.txt")).unwrap();
    assert!(cmake.starts_with("# Autogenerated file; DO NOT EDIT!\n"));
    assert_eq!(cmake.matches("# dependency: ").count(), 1);
    assert!(cmake.contains("CHECK_INCLUDE_FILE_CXX(\"argh.h\" MK_HAVE_ARGH_H)"));
    assert!(cmake.contains("add_executable(\n  demo\n  main.cc\n)\n"));
    assert!(cmake.contains("# test: smoke\n"));
}

#[test]
fn test_autogen_is_idempotent() {
    let tmp = project(ARGH_MANIFEST);

    mkbuild(tmp.path())
        .arg("autogen")
        .current_dir(tmp.path())
        .assert()
        .success();
    let first = fs::read(tmp.path().join("CMakeLists.txt")).unwrap();

    mkbuild(tmp.path())
        .arg("autogen")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("unchanged"));
    let second = fs::read(tmp.path().join("CMakeLists.txt")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_autogen_with_directory_flag() {
    let tmp = project(ARGH_MANIFEST);
    let elsewhere = TempDir::new().unwrap();

    mkbuild(elsewhere.path())
        .args(["-C", tmp.path().to_str().unwrap(), "autogen"])
        .current_dir(elsewhere.path())
        .assert()
        .success();

    assert!(tmp.path().join("CMakeLists.txt").exists());
    assert!(!elsewhere.path().join("CMakeLists.txt").exists());
}

#[test]
fn test_autogen_with_relative_directory_flag() {
    let parent = TempDir::new().unwrap();
    fs::create_dir(parent.path().join("proj")).unwrap();
    fs::write(parent.path().join("proj/MKBuild.yaml"), ARGH_MANIFEST).unwrap();

    mkbuild(parent.path())
        .args(["-C", "proj", "autogen"])
        .current_dir(parent.path())
        .assert()
        .success();

    assert!(parent.path().join("proj/CMakeLists.txt").exists());
}

#[test]
fn test_missing_directory_flag_fails() {
    let tmp = TempDir::new().unwrap();

    mkbuild(tmp.path())
        .args(["-C", "nope", "autogen"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to resolve directory"));
}

#[test]
fn test_autogen_unknown_dependency_fails() {
    let tmp = project(UNKNOWN_MANIFEST);

    mkbuild(tmp.path())
        .arg("autogen")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown dependency `not.a.real/dep`"));

    assert!(!tmp.path().join("CMakeLists.txt").exists());
}

#[test]
fn test_autogen_unknown_dependency_warn_flag() {
    let tmp = project(UNKNOWN_MANIFEST);

    mkbuild(tmp.path())
        .args(["autogen", "--unknown-deps", "warn"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("not.a.real/dep"));

    let cmake = fs::read_to_string(tmp.path().join("CMakeLists.txt")).unwrap();
    assert_eq!(cmake.matches("# dependency: ").count(), 1);
}

#[test]
fn test_autogen_unknown_dependency_env() {
    let tmp = project(UNKNOWN_MANIFEST);

    mkbuild(tmp.path())
        .arg("autogen")
        .env("MKBUILD_UNKNOWN_DEPS", "warn")
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(tmp.path().join("CMakeLists.txt").exists());
}

#[test]
fn test_autogen_unknown_dependency_project_config() {
    let tmp = project(UNKNOWN_MANIFEST);
    fs::create_dir_all(tmp.path().join(".mkbuild")).unwrap();
    fs::write(
        tmp.path().join(".mkbuild/config.toml"),
        "[autogen]\nunknown_dependency = \"warn\"\n",
    )
    .unwrap();

    mkbuild(tmp.path())
        .arg("autogen")
        .current_dir(tmp.path())
        .assert()
        .success();

    // The flag still wins over the config file.
    mkbuild(tmp.path())
        .args(["autogen", "--unknown-deps", "error"])
        .current_dir(tmp.path())
        .assert()
        .failure();
}

#[test]
fn test_autogen_without_manifest() {
    let tmp = TempDir::new().unwrap();

    mkbuild(tmp.path())
        .arg("autogen")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not find MKBuild.yaml"));
}

#[test]
fn test_autogen_rejects_invalid_manifest() {
    let tmp = project("name: demo\nsources: [main.cc]\n");

    mkbuild(tmp.path())
        .arg("autogen")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
}

#[test]
fn test_autogen_names_retired_field() {
    let tmp = project("name: demo\namalgamate:\n  mk.hpp: [a.hpp]\n");

    mkbuild(tmp.path())
        .arg("autogen")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("field `amalgamate` is no longer supported"));

    assert!(!tmp.path().join("CMakeLists.txt").exists());
}

#[test]
fn test_autogen_script_in_subdirectory() {
    let tmp = project("name: demo\ntargets:\n  scripts:\n    tools/run.sh: {}\n");

    mkbuild(tmp.path())
        .arg("autogen")
        .current_dir(tmp.path())
        .assert()
        .success();

    let cmake = fs::read_to_string(tmp.path().join("CMakeLists.txt")).unwrap();
    assert!(cmake.contains("${CMAKE_CURRENT_SOURCE_DIR}/tools/run.sh"));
}

// ============================================================================
// mkbuild docker
// ============================================================================

#[test]
fn test_docker_script_only() {
    let tmp = project(ARGH_MANIFEST);

    mkbuild(tmp.path())
        .args(["docker", "asan", "--script-only"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let script = fs::read_to_string(tmp.path().join(".mkbuild/script/runner.sh")).unwrap();
    assert!(script.starts_with("#!/bin/sh -e\nBUILD_TYPE=\"asan\"\n"));
    assert!(script.contains("tc qdisc add dev eth0"));
    assert!(!tmp.path().join("CMakeLists.txt").exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(tmp.path().join(".mkbuild/script/runner.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

#[test]
fn test_docker_script_without_tc() {
    let tmp = project(&format!("{}docker_tc_disabled: true\n", ARGH_MANIFEST));

    mkbuild(tmp.path())
        .args(["docker", "vanilla", "--script-only"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let script = fs::read_to_string(tmp.path().join(".mkbuild/script/runner.sh")).unwrap();
    assert!(!script.contains("tc qdisc"));
}

#[test]
fn test_docker_invalid_build_type() {
    let tmp = project(ARGH_MANIFEST);

    mkbuild(tmp.path())
        .args(["docker", "msan", "--script-only"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));

    assert!(!tmp.path().join(".mkbuild").exists());
}

// ============================================================================
// usage
// ============================================================================

#[test]
fn test_no_subcommand_prints_usage() {
    let tmp = TempDir::new().unwrap();

    mkbuild(tmp.path())
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_help_lists_subcommands() {
    let tmp = TempDir::new().unwrap();

    mkbuild(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("autogen").and(predicate::str::contains("docker")));
}
