//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use mkbuild::ops::docker::BuildType;
use mkbuild::util::config::{Config, UnknownDependencyPolicy};

/// mkbuild - generate CMake projects and containerized test runners
#[derive(Parser)]
#[command(name = "mkbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run as if started in <DIR>
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate CMakeLists.txt from MKBuild.yaml
    Autogen(AutogenArgs),

    /// Build and test the project inside a container
    Docker(DockerArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct UnknownDepsArg {
    /// What to do with dependencies mkbuild has no rule for
    #[arg(long, value_enum, env = "MKBUILD_UNKNOWN_DEPS")]
    pub unknown_deps: Option<UnknownDependencyPolicy>,
}

impl UnknownDepsArg {
    /// The flag or environment value, falling back to the configuration.
    pub fn resolve(&self, config: &Config) -> UnknownDependencyPolicy {
        self.unknown_deps
            .unwrap_or_else(|| config.unknown_dependency())
    }
}

#[derive(Args)]
pub struct AutogenArgs {
    #[command(flatten)]
    pub policy: UnknownDepsArg,
}

#[derive(Args)]
pub struct DockerArgs {
    /// Build type
    #[arg(value_enum)]
    pub build_type: BuildType,

    /// Only write .mkbuild/script/runner.sh
    #[arg(long)]
    pub script_only: bool,

    #[command(flatten)]
    pub policy: UnknownDepsArg,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flag_overrides_config() {
        let mut config = Config::default();
        config.autogen.unknown_dependency = Some(UnknownDependencyPolicy::Warn);

        let flag = UnknownDepsArg {
            unknown_deps: Some(UnknownDependencyPolicy::Error),
        };
        assert_eq!(flag.resolve(&config), UnknownDependencyPolicy::Error);
        assert_eq!(
            UnknownDepsArg::default().resolve(&config),
            UnknownDependencyPolicy::Warn
        );
    }
}
