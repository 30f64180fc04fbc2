//! Build context - configuration, project, layout and collaborators.

use std::fmt;
use std::path::PathBuf;

use crate::builder::errors::BuildError;
use crate::core::{BuildConfiguration, BuildLayout, Project};
use crate::sources::RevisionProvider;
use crate::util::process::{ProcessBuilder, ToolRunner};

/// Everything a build stage needs, borrowed for one pipeline run.
pub struct BuildContext<'a> {
    /// Resolved build configuration
    pub config: &'a BuildConfiguration,

    /// Project being built
    pub project: &'a Project,

    /// Paths under the build root
    pub layout: BuildLayout,

    /// Runs external tools
    pub runner: &'a dyn ToolRunner,

    /// Reads checkout revisions
    pub revisions: &'a dyn RevisionProvider,
}

impl fmt::Debug for BuildContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("config", &self.config)
            .field("root", &self.project.root())
            .field("layout", &self.layout)
            .finish()
    }
}

impl<'a> BuildContext<'a> {
    pub fn new(
        config: &'a BuildConfiguration,
        project: &'a Project,
        runner: &'a dyn ToolRunner,
        revisions: &'a dyn RevisionProvider,
    ) -> Self {
        BuildContext {
            config,
            project,
            layout: BuildLayout::new(project, config),
            runner,
            revisions,
        }
    }

    /// CMake toolchain file for the configured target.
    pub fn toolchain_file(&self) -> PathBuf {
        self.project.toolchain_file(self.config)
    }

    /// Embedded SDK root; required for embedded cross builds.
    pub fn embedded_home(&self) -> Result<PathBuf, BuildError> {
        self.project
            .embedded_home(self.config)
            .ok_or_else(|| BuildError::MissingEmbeddedHome {
                tuple: self.config.target_tuple(),
            })
    }

    /// Run a tool and require a zero exit code.
    pub fn run(&self, cmd: &ProcessBuilder) -> Result<(), BuildError> {
        let outcome = self.runner.run(cmd)?;
        if !outcome.is_success() {
            return Err(BuildError::ToolchainInvocationFailed {
                command: cmd.display_command(),
                exit_code: outcome.code,
            });
        }
        Ok(())
    }
}
