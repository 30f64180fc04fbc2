//! `dockyard config` command
//!
//! Prints the configuration a build with the same options would use, so
//! options dropped by the lenient resolver can be spotted.

use anyhow::Result;

use crate::cli::ConfigArgs;
use dockyard::ops::{render_config, resolve_config};
use dockyard::util::GlobalContext;

pub fn execute(args: ConfigArgs, gctx: &GlobalContext) -> Result<()> {
    let (project, config) = resolve_config(gctx, &args.options)?;

    println!("# project root: {}", project.root().display());
    print!("{}", render_config(&config)?);
    Ok(())
}
