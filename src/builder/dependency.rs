//! Revision-cached build of one native dependency.

use std::path::PathBuf;

use anyhow::Context as _;

use crate::builder::cache::CacheStore;
use crate::builder::cmake::configure_with_detection_workaround;
use crate::builder::context::BuildContext;
use crate::builder::errors::BuildError;
use crate::builder::recipes::DependencyRecipe;
use crate::builder::target::BuildTarget;
use crate::util::fs::ensure_dir;

/// Result of building one dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyReport {
    pub dependency: String,
    pub revision: String,
    /// Targets served from the cache
    pub fresh: Vec<String>,
    /// Targets built by this run
    pub built: Vec<String>,
    /// Libraries copied into the shared libs directory
    pub libs: Vec<PathBuf>,
}

impl DependencyReport {
    pub fn is_fresh(&self) -> bool {
        self.built.is_empty()
    }
}

/// Builds the targets of a recipe that are not already cached.
pub struct DependencyBuilder<'a, 'ctx> {
    ctx: &'a BuildContext<'ctx>,
    recipe: &'a dyn DependencyRecipe,
}

impl<'a, 'ctx> DependencyBuilder<'a, 'ctx> {
    pub fn new(ctx: &'a BuildContext<'ctx>, recipe: &'a dyn DependencyRecipe) -> Self {
        DependencyBuilder { ctx, recipe }
    }

    pub fn build(&self) -> Result<DependencyReport, BuildError> {
        let name = self.recipe.name();
        let checkout = self.recipe.checkout(self.ctx);
        if !checkout.is_dir() {
            return Err(BuildError::MissingDependencyCheckout {
                dependency: name.to_string(),
                path: checkout,
            });
        }

        let revision = self.ctx.revisions.revision(&checkout)?;
        let cache = CacheStore::new(
            self.ctx.layout.dep_cache_dir(name),
            self.ctx.config.sync_submodules(),
        );

        let targets: Vec<BuildTarget> = self
            .recipe
            .target_specs(self.ctx.config)
            .iter()
            .map(|spec| BuildTarget::resolve(spec, &cache, &revision))
            .collect();

        let (fresh, missing): (Vec<&BuildTarget>, Vec<&BuildTarget>) =
            targets.iter().partition(|t| cache.is_cached(t.key()));

        for target in &fresh {
            tracing::info!("{} {} is cached at {}", name, target.label(), &revision);
        }

        if !missing.is_empty() {
            self.generate()?;
            for target in &missing {
                self.build_target(&cache, target)?;
            }
        }

        let libs_dir = self.ctx.layout.libs_dir();
        let mut libs = Vec::with_capacity(targets.len());
        for target in &targets {
            let lib = cache
                .materialize(target.key(), target.name(), &libs_dir)
                .with_context(|| format!("failed to copy {} into {}", target.label(), libs_dir.display()))?;
            libs.push(lib);
        }

        Ok(DependencyReport {
            dependency: name.to_string(),
            revision,
            fresh: fresh.iter().map(|t| t.label()).collect(),
            built: missing.iter().map(|t| t.label()).collect(),
            libs,
        })
    }

    fn generate(&self) -> Result<(), BuildError> {
        ensure_dir(&self.ctx.layout.dep_home(self.recipe.name()))?;
        let cmd = self.recipe.configure_command(self.ctx)?;
        configure_with_detection_workaround(self.ctx, &cmd)
    }

    fn build_target(&self, cache: &CacheStore, target: &BuildTarget) -> Result<(), BuildError> {
        tracing::info!("building {} {}", self.recipe.name(), target.label());

        self.ctx.run(&self.recipe.build_command(self.ctx, target))?;

        let output = self.recipe.expected_output(self.ctx, target);
        if !output.is_file() {
            return Err(BuildError::ArtifactNotProduced {
                target: target.label(),
                path: output,
            });
        }

        cache.publish(target.key(), &output)?;
        Ok(())
    }
}
