//! Implementation of `dockyard config`.

use anyhow::{Context, Result};

use crate::core::{BuildConfiguration, Project};
use crate::util::GlobalContext;

/// Load the project and resolve `options` on top of its `[defaults]`.
pub fn resolve_config(gctx: &GlobalContext, options: &[String]) -> Result<(Project, BuildConfiguration)> {
    let project = gctx.load_project()?;
    let config = project.resolve_options(options);
    Ok((project, config))
}

/// Render a configuration as TOML, the way `[defaults]` would spell it.
pub fn render_config(config: &BuildConfiguration) -> Result<String> {
    toml::to_string(config).context("failed to serialize build configuration")
}
