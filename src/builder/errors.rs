//! Build failure taxonomy.
//!
//! Every failure ends the pipeline; there is no retry and no distinction
//! between transient and permanent errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::util::process::ProcessError;

/// Error raised by a build stage.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{dependency} checkout not found at {}", path.display())]
    MissingDependencyCheckout { dependency: String, path: PathBuf },

    #[error("target `{tuple}` requires `--embedded-home` to be set")]
    MissingEmbeddedHome { tuple: String },

    #[error("`{command}` failed with {}", describe_exit(.exit_code))]
    ToolchainInvocationFailed {
        command: String,
        exit_code: Option<i32>,
    },

    #[error("{target} was not produced (expected {})", path.display())]
    ArtifactNotProduced { target: String, path: PathBuf },

    #[error("style check failed with {}", describe_exit(.exit_code))]
    StyleCheckFailed { exit_code: Option<i32> },

    #[error("test harness failed with {}", describe_exit(.exit_code))]
    TestHarnessFailed { exit_code: Option<i32> },

    #[error("failed to read the revision of {}", path.display())]
    Revision {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = BuildError::ToolchainInvocationFailed {
            command: "make -C out".to_string(),
            exit_code: Some(2),
        };
        assert_eq!(err.to_string(), "`make -C out` failed with exit code 2");

        let err = BuildError::TestHarnessFailed { exit_code: None };
        assert!(err.to_string().contains("terminated by signal"));

        let err = BuildError::MissingDependencyCheckout {
            dependency: "libuv".to_string(),
            path: PathBuf::from("/src/deps/libuv"),
        };
        assert_eq!(err.to_string(), "libuv checkout not found at /src/deps/libuv");
    }
}
