//! Implementation of `dockyard cache`.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::builder::recipes::{AsyncIoRecipe, DependencyRecipe, VmCoreRecipe};
use crate::builder::{CacheEntry, CacheStore};
use crate::core::{BuildConfiguration, BuildLayout, Project};

/// Cached artifacts of one dependency.
#[derive(Debug, Clone, Serialize)]
pub struct CacheListing {
    pub dependency: String,
    pub dir: PathBuf,
    pub entries: Vec<CacheEntry>,
}

/// List the cache of every dependency under the configuration's build root.
pub fn list_cache(project: &Project, config: &BuildConfiguration) -> Result<Vec<CacheListing>> {
    let layout = BuildLayout::new(project, config);
    let recipes: [&dyn DependencyRecipe; 2] = [&AsyncIoRecipe, &VmCoreRecipe];

    recipes
        .iter()
        .map(|recipe| -> Result<CacheListing> {
            let dir = layout.dep_cache_dir(recipe.name());
            let store = CacheStore::new(dir.clone(), config.sync_submodules());
            Ok(CacheListing {
                dependency: recipe.name().to_string(),
                entries: store.entries()?,
                dir,
            })
        })
        .collect()
}
