//! `mkbuild docker` command

use anyhow::Result;

use crate::cli::DockerArgs;
use mkbuild::ops::autogen::AutogenOptions;
use mkbuild::ops::docker::{docker, DockerOptions};
use mkbuild::GlobalContext;

pub fn execute(args: DockerArgs, ctx: &GlobalContext) -> Result<()> {
    let config = ctx.config();
    let opts = DockerOptions {
        build_type: args.build_type,
        script_only: args.script_only,
        configured_image: config.docker.image.clone(),
        autogen: AutogenOptions {
            unknown_dependency: args.policy.resolve(&config),
        },
    };

    let script = docker(ctx, &opts)?;

    if args.script_only {
        eprintln!("     Written {}", script.display());
    } else {
        eprintln!("    Finished {} build", args.build_type);
    }

    Ok(())
}
