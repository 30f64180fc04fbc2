//! Collaborator commands configured under `[hooks]` plus submodule sync.
//!
//! Hook functions return `Ok(false)` when the hook's argument vector is
//! empty, i.e. the hook is disabled in `Dockyard.toml`.

use std::path::{Path, PathBuf};

use crate::builder::context::BuildContext;
use crate::builder::errors::BuildError;
use crate::util::process::ProcessBuilder;

/// Build a process from a hook's argv.
///
/// A relative program containing a path separator is taken relative to the
/// project root; bare names are looked up in `PATH` when run.
fn hook_command(argv: &[String], root: &Path) -> Option<ProcessBuilder> {
    let (program, args) = argv.split_first()?;

    let program = PathBuf::from(program);
    let program = if program.is_relative() && program.components().count() > 1 {
        root.join(program)
    } else {
        program
    };

    Some(ProcessBuilder::new(program).args(args))
}

/// Run the style checker over the project root.
pub fn style_check(ctx: &BuildContext) -> Result<bool, BuildError> {
    let root = ctx.project.root();
    let Some(cmd) = hook_command(&ctx.project.config().hooks.style_check, root) else {
        return Ok(false);
    };
    let cmd = cmd.arg(root).cwd(root);

    let outcome = ctx.runner.run(&cmd)?;
    if !outcome.is_success() {
        return Err(BuildError::StyleCheckFailed {
            exit_code: outcome.code,
        });
    }
    Ok(true)
}

/// `git submodule init` followed by `git submodule update` in the project root.
pub fn sync_submodules(ctx: &BuildContext) -> Result<(), BuildError> {
    let root = ctx.project.root();
    for step in ["init", "update"] {
        let cmd = ProcessBuilder::new(ctx.project.git())
            .args(["submodule", step])
            .cwd(root);
        ctx.run(&cmd)?;
    }
    Ok(())
}

/// Bundle the runtime's scripts, run from the tools directory.
pub fn codegen(ctx: &BuildContext) -> Result<bool, BuildError> {
    let Some(cmd) = hook_command(&ctx.project.config().hooks.codegen, ctx.project.root()) else {
        return Ok(false);
    };
    ctx.run(&cmd.cwd(ctx.project.tools_dir()))?;
    Ok(true)
}

/// Run the test harness against the runtime executable.
pub fn test_harness(ctx: &BuildContext, executable: &Path) -> Result<bool, BuildError> {
    let root = ctx.project.root();
    let Some(cmd) = hook_command(&ctx.project.config().hooks.test_harness, root) else {
        return Ok(false);
    };
    let cmd = cmd.arg(executable).cwd(root);

    let outcome = ctx.runner.run(&cmd)?;
    if !outcome.is_success() {
        return Err(BuildError::TestHarnessFailed {
            exit_code: outcome.code,
        });
    }
    Ok(true)
}
