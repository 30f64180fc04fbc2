//! Global context for Dockyard operations.
//!
//! Knows where the command was started and which directory is the project
//! root.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::Project;
use crate::util::config::PROJECT_FILE;

/// Working directory plus an optional `--root` override.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Project root given on the command line
    root_override: Option<PathBuf>,
}

impl GlobalContext {
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(GlobalContext::with_cwd(cwd))
    }

    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            root_override: None,
        }
    }

    /// Use `root` as project root instead of searching. Relative paths are
    /// taken from the working directory.
    pub fn set_root(&mut self, root: PathBuf) {
        self.root_override = Some(self.cwd.join(root));
    }

    /// Find the project root.
    ///
    /// Without an override, the nearest ancestor of the working directory
    /// holding a `Dockyard.toml` wins; with none found the working directory
    /// itself is the root.
    pub fn project_root(&self) -> PathBuf {
        if let Some(root) = &self.root_override {
            return root.clone();
        }

        root_for(&self.cwd, self.find_project_file())
    }

    /// Search the working directory and its ancestors for `Dockyard.toml`.
    pub fn find_project_file(&self) -> Option<PathBuf> {
        self.cwd
            .ancestors()
            .map(|dir| dir.join(PROJECT_FILE))
            .find(|file| file.is_file())
    }

    pub fn load_project(&self) -> Result<Project> {
        let root = self.project_root();
        if !root.is_dir() {
            anyhow::bail!("project root {} is not a directory", root.display());
        }
        tracing::debug!("project root: {}", root.display());
        Project::load(&root)
    }
}

/// Directory of the project file found, or `cwd` when there is none.
fn root_for(cwd: &Path, project_file: Option<PathBuf>) -> PathBuf {
    project_file
        .and_then(|file| file.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| cwd.to_path_buf())
}
