//! Test doubles for Dockyard unit tests.
//!
//! [`RecordingRunner`] stands in for the real tools: it records every
//! command and answers with configurable outcomes, optionally creating the
//! files a tool would produce. [`FixedRevisions`] replaces git.
//!
//! # Example
//!
//! ```rust,ignore
//! let fixture = ProjectFixture::new();
//! let config = fixture.config(&["--build-type=release"]);
//! let runner = RecordingRunner::with_fake_tools("iotjs").fail_on("gyp_uv.py", 1);
//! let revisions = FixedRevisions::new("abc");
//! let ctx = BuildContext::new(&config, &fixture.project, &runner, &revisions);
//! ```

pub mod fixtures;

use std::cell::RefCell;
use std::path::Path;

use crate::builder::errors::BuildError;
use crate::sources::RevisionProvider;
use crate::util::process::{ProcessBuilder, ProcessError, ToolOutcome, ToolRunner};

pub use fixtures::*;

/// Pattern for matching recorded commands.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on the full command line.
    Exact(String),
    StartsWith(String),
    Contains(String),
    /// Match on the program's file name.
    Program(String),
    Any,
}

impl CommandPattern {
    pub fn matches(&self, cmd: &ProcessBuilder) -> bool {
        let line = cmd.display_command();
        match self {
            CommandPattern::Exact(s) => line == *s,
            CommandPattern::StartsWith(s) => line.starts_with(s.as_str()),
            CommandPattern::Contains(s) => line.contains(s.as_str()),
            CommandPattern::Program(name) => cmd.program_name() == *name,
            CommandPattern::Any => true,
        }
    }
}

type Responder = Box<dyn Fn(&ProcessBuilder) -> ToolOutcome>;

/// A [`ToolRunner`] that records commands instead of running them.
///
/// Commands with no matching responder succeed without side effects. When
/// several responders match, the one registered last wins.
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<ProcessBuilder>>,
    responders: Vec<(CommandPattern, Responder)>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        RecordingRunner::default()
    }

    /// Answer commands matching `pattern` with `responder`.
    pub fn respond(
        mut self,
        pattern: CommandPattern,
        responder: impl Fn(&ProcessBuilder) -> ToolOutcome + 'static,
    ) -> Self {
        self.responders.push((pattern, Box::new(responder)));
        self
    }

    /// Fail commands whose line contains `needle` with exit code `code`.
    pub fn fail_on(self, needle: &str, code: i32) -> Self {
        self.respond(CommandPattern::Contains(needle.to_string()), move |_| {
            ToolOutcome::failure(code)
        })
    }

    /// Command lines run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(ProcessBuilder::display_command)
            .collect()
    }

    pub fn count_matching(&self, pattern: &CommandPattern) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|cmd| pattern.matches(cmd))
            .count()
    }
}

impl ToolRunner for RecordingRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<ToolOutcome, ProcessError> {
        self.calls.borrow_mut().push(cmd.clone());

        let outcome = self
            .responders
            .iter()
            .rev()
            .find(|(pattern, _)| pattern.matches(cmd))
            .map(|(_, responder)| responder(cmd))
            .unwrap_or_else(ToolOutcome::success);

        Ok(outcome)
    }
}

/// Revision provider returning the same revision for every checkout.
#[derive(Debug, Clone)]
pub struct FixedRevisions {
    revision: String,
}

impl FixedRevisions {
    pub fn new(revision: impl Into<String>) -> Self {
        FixedRevisions {
            revision: revision.into(),
        }
    }
}

impl RevisionProvider for FixedRevisions {
    fn revision(&self, _checkout: &Path) -> Result<String, BuildError> {
        Ok(self.revision.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_runner_defaults_to_success() {
        let runner = RecordingRunner::new();
        let outcome = runner
            .run(&ProcessBuilder::new("make").arg("-j"))
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(runner.calls(), vec!["make -j"]);
    }

    #[test]
    fn test_last_responder_wins() {
        let runner = RecordingRunner::new()
            .respond(CommandPattern::Any, |_| ToolOutcome::failure(1))
            .respond(CommandPattern::Program("cmake".into()), |_| {
                ToolOutcome::success()
            });

        assert!(runner.run(&ProcessBuilder::new("cmake")).unwrap().is_success());
        assert_eq!(
            runner.run(&ProcessBuilder::new("make")).unwrap(),
            ToolOutcome::failure(1)
        );
        assert_eq!(runner.count_matching(&CommandPattern::Any), 2);
    }

    #[test]
    fn test_patterns() {
        let cmd = ProcessBuilder::new("/usr/bin/make").args(["-C", "out"]);

        assert!(CommandPattern::Exact("/usr/bin/make -C out".into()).matches(&cmd));
        assert!(CommandPattern::StartsWith("/usr/bin".into()).matches(&cmd));
        assert!(CommandPattern::Contains("-C out".into()).matches(&cmd));
        assert!(CommandPattern::Program("make".into()).matches(&cmd));
        assert!(!CommandPattern::Program("cmake".into()).matches(&cmd));
    }
}
