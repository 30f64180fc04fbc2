//! On-disk layout of a build root.
//!
//! ```text
//! <build root>/
//!   libs/                         shared static libraries for the runtime
//!   deps/<dep>/                   dependency build home
//!   deps/<dep>/cache/             <lib>.<revision>[-dirty]
//!   runtime/                      final executable or library
//! ```

use std::path::{Path, PathBuf};

use crate::core::options::BuildConfiguration;
use crate::core::project::Project;

/// Paths under one build root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    root: PathBuf,
}

impl BuildLayout {
    pub fn new(project: &Project, config: &BuildConfiguration) -> Self {
        BuildLayout {
            root: project.build_root(config),
        }
    }

    pub fn from_root(root: PathBuf) -> Self {
        BuildLayout { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Shared directory the runtime links from.
    pub fn libs_dir(&self) -> PathBuf {
        self.root.join("libs")
    }

    pub fn deps_dir(&self) -> PathBuf {
        self.root.join("deps")
    }

    /// Build home of one dependency.
    pub fn dep_home(&self, dependency: &str) -> PathBuf {
        self.deps_dir().join(dependency)
    }

    pub fn dep_cache_dir(&self, dependency: &str) -> PathBuf {
        self.dep_home(dependency).join("cache")
    }

    pub fn runtime_dir(&self) -> PathBuf {
        self.root.join("runtime")
    }
}
