//! `mkbuild autogen` command

use anyhow::Result;

use crate::cli::AutogenArgs;
use mkbuild::ops::autogen::{autogen, AutogenOptions};
use mkbuild::GlobalContext;

pub fn execute(args: AutogenArgs, ctx: &GlobalContext) -> Result<()> {
    let config = ctx.config();
    let opts = AutogenOptions {
        unknown_dependency: args.policy.resolve(&config),
    };

    let report = autogen(ctx, &opts)?;

    if !report.skipped.is_empty() {
        eprintln!("     Skipped {}", report.skipped.join(", "));
    }
    eprintln!(
        "   Generated {} ({} dependencies{})",
        report.path.display(),
        report.dependencies.len(),
        if report.changed { "" } else { ", unchanged" }
    );

    Ok(())
}
