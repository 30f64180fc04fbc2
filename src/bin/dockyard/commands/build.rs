//! `dockyard build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use dockyard::ops::dockyard_build::{build, BuildOptions};
use dockyard::util::{GlobalContext, Shell};

pub fn execute(args: BuildArgs, gctx: &GlobalContext, shell: &Shell) -> Result<()> {
    let opts = BuildOptions {
        options: args.options,
    };

    build(gctx, shell, &opts)?;
    Ok(())
}
