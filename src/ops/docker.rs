//! Implementation of `mkbuild docker`.
//!
//! Regenerates CMakeLists.txt, renders `.mkbuild/script/runner.sh` for the
//! requested build type and runs it inside a container with the project
//! mounted at `/mk`.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::core::manifest::PackageInfo;
use crate::ops::autogen::{autogen, AutogenOptions};
use crate::util::context::GlobalContext;
use crate::util::fs::{ensure_dir, write_atomic};
use crate::util::process::{find_executable, ProcessBuilder};

/// Image used when neither the manifest nor the config names one.
pub const DEFAULT_IMAGE: &str = "bassosimone/mk-debian";

/// Runner script path relative to the project root.
pub const RUNNER_SCRIPT: &str = ".mkbuild/script/runner.sh";

/// Mount point of the project inside the container.
const CONTAINER_ROOT: &str = "/mk";

const NETEM: &str = "# Make sure we don't consume too much resources by bumping latency
tc qdisc add dev eth0 root netem delay 200ms 10ms

";

const RUNNER_TEMPLATE: &str = r#"#!/bin/sh -e
BUILD_TYPE="@BUILD_TYPE@"
export CODECOV_TOKEN="@CODECOV_TOKEN@"
export TRAVIS_BRANCH="@TRAVIS_BRANCH@"
set -x

cd /mk
env | grep -v TOKEN | sort

@NETEM@# Select the proper build flags depending on the build type
if [ "$BUILD_TYPE" = "asan" ]; then
  export CFLAGS="-fsanitize=address -O1 -fno-omit-frame-pointer"
  export CXXFLAGS="-fsanitize=address -O1 -fno-omit-frame-pointer"
  export LDFLAGS="-fsanitize=address -fno-omit-frame-pointer"
  export CMAKE_BUILD_TYPE="Debug"

elif [ "$BUILD_TYPE" = "clang" ]; then
  export CMAKE_BUILD_TYPE="Release"
  export CXXFLAGS="-stdlib=libc++"
  export CC=clang
  export CXX=clang++

elif [ "$BUILD_TYPE" = "coverage" ]; then
  export CFLAGS="-O0 -g -fprofile-arcs -ftest-coverage"
  export CMAKE_BUILD_TYPE="Debug"
  export CXXFLAGS="-O0 -g -fprofile-arcs -ftest-coverage"
  export LDFLAGS="-lgcov"

elif [ "$BUILD_TYPE" = "tsan" ]; then
  export CFLAGS="-fsanitize=thread -O1"
  export CXXFLAGS="-fsanitize=thread -O1"
  export LDFLAGS="-fsanitize=thread"
  export CMAKE_BUILD_TYPE="Debug"

elif [ "$BUILD_TYPE" = "ubsan" ]; then
  export CFLAGS="-fsanitize=undefined -fno-sanitize-recover"
  export CXXFLAGS="-fsanitize=undefined -fno-sanitize-recover"
  export LDFLAGS="-fsanitize=undefined"
  export CMAKE_BUILD_TYPE="Debug"

elif [ "$BUILD_TYPE" = "vanilla" ]; then
  export CMAKE_BUILD_TYPE="Release"

else
  echo "$0: BUILD_TYPE not in: asan, clang, coverage, tsan, ubsan, vanilla" 1>&2
  exit 1
fi

# Configure, make, and make check equivalent
cmake -GNinja -DCMAKE_BUILD_TYPE=$CMAKE_BUILD_TYPE .
cmake --build . -- -v
ctest --output-on-failure -a -j8

# Measure and possibly report the test coverage
if [ "$BUILD_TYPE" = "coverage" ]; then
  lcov --directory . --capture -o lcov.info
  if [ "$CODECOV_TOKEN" != "" ]; then
    curl -fsSL -o codecov.sh https://codecov.io/bash
    bash codecov.sh -X gcov -Z -f lcov.info
  fi
fi
"#;

/// Compilation profile for a containerized run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BuildType {
    /// AddressSanitizer, Debug
    Asan,
    /// clang with libc++, Release
    Clang,
    /// gcov instrumentation, Debug
    Coverage,
    /// ThreadSanitizer, Debug
    Tsan,
    /// UndefinedBehaviorSanitizer, Debug
    Ubsan,
    /// Default toolchain, Release
    Vanilla,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Asan => "asan",
            BuildType::Clang => "clang",
            BuildType::Coverage => "coverage",
            BuildType::Tsan => "tsan",
            BuildType::Ubsan => "ubsan",
            BuildType::Vanilla => "vanilla",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values substituted into the runner template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerScript {
    pub build_type: BuildType,
    pub codecov_token: String,
    pub travis_branch: String,
    /// Skip the artificial latency added with `tc`
    pub tc_disabled: bool,
}

impl RunnerScript {
    /// Take `CODECOV_TOKEN` and `TRAVIS_BRANCH` from the environment.
    pub fn from_env(build_type: BuildType, tc_disabled: bool) -> Self {
        RunnerScript {
            build_type,
            codecov_token: std::env::var("CODECOV_TOKEN").unwrap_or_default(),
            travis_branch: std::env::var("TRAVIS_BRANCH").unwrap_or_default(),
            tc_disabled,
        }
    }

    /// Render the script text.
    pub fn render(&self) -> String {
        RUNNER_TEMPLATE
            .replace("@BUILD_TYPE@", self.build_type.as_str())
            .replace("@CODECOV_TOKEN@", &escape_double_quoted(&self.codecov_token))
            .replace("@TRAVIS_BRANCH@", &escape_double_quoted(&self.travis_branch))
            .replace("@NETEM@", if self.tc_disabled { "" } else { NETEM })
    }

    /// Write the script below `project_root` with mode 0755.
    pub fn write(&self, project_root: &Path) -> Result<PathBuf> {
        let path = project_root.join(RUNNER_SCRIPT);
        if let Some(dir) = path.parent() {
            ensure_dir(dir)?;
        }
        write_atomic(&path, &self.render(), 0o755)?;
        tracing::info!("Written {}", path.display());
        Ok(path)
    }
}

/// Make `value` safe inside a double-quoted sh string.
fn escape_double_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Error while launching the container.
#[derive(Debug, Error)]
pub enum DockerError {
    #[error("`docker` was not found in PATH")]
    NotFound,

    #[error("docker run failed with exit code {code:?}; please see the above logs")]
    ContainerFailed { code: Option<i32> },
}

/// Options for the docker command.
#[derive(Debug, Clone)]
pub struct DockerOptions {
    /// Build type passed to the runner
    pub build_type: BuildType,

    /// Write the runner script without regenerating or launching anything
    pub script_only: bool,

    /// Image from the configuration files
    pub configured_image: Option<String>,

    /// Options for the CMakeLists.txt regeneration
    pub autogen: AutogenOptions,
}

/// Pick the container image: manifest, then configuration, then default.
pub fn select_image(pkg: &PackageInfo, configured: Option<&str>) -> String {
    pkg.docker
        .as_deref()
        .or(configured)
        .unwrap_or(DEFAULT_IMAGE)
        .to_string()
}

/// Absolute host path of `project_root`, as docker takes any other bind
/// mount source for a named volume.
pub fn mount_source(project_root: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(project_root)
        .with_context(|| format!("failed to resolve {}", project_root.display()))
}

/// Arguments passed to `docker` to run the runner script.
pub fn docker_run_args(project_root: &Path, image: &str) -> Vec<String> {
    vec![
        "run".to_string(),
        "--cap-add=NET_ADMIN".to_string(),
        "-v".to_string(),
        format!("{}:{}", project_root.display(), CONTAINER_ROOT),
        "-t".to_string(),
        image.to_string(),
        format!("{}/{}", CONTAINER_ROOT, RUNNER_SCRIPT),
    ]
}

/// Write the runner script and, unless `script_only`, run it in a container.
pub fn docker(ctx: &GlobalContext, opts: &DockerOptions) -> Result<PathBuf> {
    let pkg = PackageInfo::load(&ctx.manifest_path())?;

    let script = RunnerScript::from_env(opts.build_type, pkg.docker_tc_disabled);
    let path = script.write(ctx.cwd())?;
    if opts.script_only {
        return Ok(path);
    }

    autogen(ctx, &opts.autogen)?;

    let docker = find_executable("docker").ok_or(DockerError::NotFound)?;
    let image = select_image(&pkg, opts.configured_image.as_deref());
    let source = mount_source(ctx.cwd())?;
    let cmd = ProcessBuilder::new(docker).args(docker_run_args(&source, &image));
    tracing::info!("Running {}", cmd.display_command());

    let status = cmd.status()?;
    if !status.success() {
        return Err(DockerError::ContainerFailed {
            code: status.code(),
        }
        .into());
    }
    Ok(path)
}
