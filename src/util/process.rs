//! Subprocess execution.
//!
//! Every external tool goes through a [`ToolRunner`]. [`SystemRunner`] runs
//! the process for real with inherited stdio and blocks until it exits; only
//! the exit code is observed.

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Builder for subprocess execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_os_string()));
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    pub fn get_program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// File name of the program, e.g. `make` for `/usr/bin/make`.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    fn build_command(&self, program: &Path) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Display the command for logs and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }
}

/// Error starting a tool.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("`{program}` not found in PATH")]
    NotFound { program: String },

    #[error("failed to execute `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Exit state of a finished tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolOutcome {
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
}

impl ToolOutcome {
    pub fn success() -> Self {
        ToolOutcome { code: Some(0) }
    }

    pub fn failure(code: i32) -> Self {
        ToolOutcome { code: Some(code) }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external tools to completion.
pub trait ToolRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<ToolOutcome, ProcessError>;
}

/// Runs tools as real child processes with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        SystemRunner
    }
}

impl ToolRunner for SystemRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<ToolOutcome, ProcessError> {
        let program = resolve_program(cmd.get_program())?;

        tracing::debug!("running `{}`", cmd.display_command());

        let status = cmd
            .build_command(&program)
            .status()
            .map_err(|source| ProcessError::Spawn {
                command: cmd.display_command(),
                source,
            })?;

        Ok(ToolOutcome {
            code: status.code(),
        })
    }
}

/// Look bare program names up in `PATH`; paths are used as given.
fn resolve_program(program: &Path) -> Result<PathBuf, ProcessError> {
    if program.components().count() > 1 {
        return Ok(program.to_path_buf());
    }

    let name = program.to_string_lossy();
    find_executable(&name).ok_or_else(|| ProcessError::NotFound {
        program: name.into_owned(),
    })
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
