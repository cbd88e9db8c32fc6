//! mkbuild CLI - generate CMake projects from MKBuild.yaml

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mkbuild::ops::autogen::AutogenError;
use mkbuild::util::diagnostic;
use mkbuild::GlobalContext;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        match e.downcast_ref::<AutogenError>() {
            Some(err) => diagnostic::emit(&err.to_diagnostic(), std::io::stderr().is_terminal()),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("mkbuild=debug")
    } else {
        EnvFilter::new("mkbuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let ctx = match cli.directory {
        Some(dir) => GlobalContext::with_directory(&dir)?,
        None => GlobalContext::new()?,
    };

    // Execute command
    match cli.command {
        Commands::Autogen(args) => commands::autogen::execute(args, &ctx),
        Commands::Docker(args) => commands::docker::execute(args, &ctx),
    }
}
