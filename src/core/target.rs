//! Target definitions - what the generated project builds.
//!
//! Targets are keyed by name in sorted maps, so every consumer iterates them
//! in lexicographic order no matter how the manifest lists them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer};

/// The kind of a declared target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetKind {
    /// Static or shared library, depending on `BUILD_SHARED_LIBS`
    Library,
    /// Executable binary
    Executable,
    /// Script copied from the source tree
    Script,
}

impl TargetKind {
    /// Get the kind name as used in section comments.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Library => "library",
            TargetKind::Executable => "executable",
            TargetKind::Script => "script",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build information for an executable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildInfo {
    /// Sources to compile
    #[serde(default)]
    pub compile: Vec<String>,

    /// Libraries to link
    #[serde(default)]
    pub link: Vec<String>,

    /// Whether `make install` installs the target
    #[serde(default)]
    pub install: bool,
}

impl BuildInfo {
    /// Create build info compiling `sources`.
    pub fn new(sources: impl IntoIterator<Item = impl Into<String>>) -> Self {
        BuildInfo {
            compile: sources.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// Build information for a library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibraryBuildInfo {
    /// Sources to compile
    #[serde(default)]
    pub compile: Vec<String>,

    /// Libraries to link
    #[serde(default)]
    pub link: Vec<String>,

    /// Whether `make install` installs the library and its headers
    #[serde(default)]
    pub install: bool,

    /// Public headers
    #[serde(default)]
    pub headers: Vec<String>,
}

/// Build information for a script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptBuildInfo {
    /// Whether `make install` installs the script
    #[serde(default)]
    pub install: bool,
}

/// All targets declared by a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetsInfo {
    #[serde(default)]
    pub libraries: BTreeMap<String, LibraryBuildInfo>,

    #[serde(default)]
    pub executables: BTreeMap<String, BuildInfo>,

    #[serde(default)]
    pub scripts: BTreeMap<String, ScriptBuildInfo>,
}

impl TargetsInfo {
    /// Iterate over every target name with its kind, libraries first.
    pub fn names(&self) -> impl Iterator<Item = (TargetKind, &str)> + '_ {
        let libraries = self
            .libraries
            .keys()
            .map(|name| (TargetKind::Library, name.as_str()));
        let executables = self
            .executables
            .keys()
            .map(|name| (TargetKind::Executable, name.as_str()));
        let scripts = self
            .scripts
            .keys()
            .map(|name| (TargetKind::Script, name.as_str()));
        libraries.chain(executables).chain(scripts)
    }
}

/// A test registered with CTest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestInfo {
    /// Command line: program followed by its arguments.
    ///
    /// Accepts a single string (split on whitespace) or a list.
    #[serde(deserialize_with = "deserialize_command")]
    pub command: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCommand {
    Line(String),
    Args(Vec<String>),
}

fn deserialize_command<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawCommand::deserialize(deserializer)? {
        RawCommand::Line(line) => line.split_whitespace().map(str::to_string).collect(),
        RawCommand::Args(args) => args,
    })
}
