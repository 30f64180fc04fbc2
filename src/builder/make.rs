//! Native build tool invocations.

use std::ffi::OsStr;
use std::path::Path;

use crate::builder::context::BuildContext;
use crate::util::process::ProcessBuilder;

/// `make <args> <make-flags>` run from `cwd`.
///
/// The configured make flags always come last.
pub fn make_command<I, S>(ctx: &BuildContext, cwd: &Path, args: I) -> ProcessBuilder
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    ProcessBuilder::new(ctx.project.make())
        .args(args)
        .args(ctx.config.make_flags())
        .cwd(cwd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixedRevisions, ProjectFixture, RecordingRunner};

    #[test]
    fn test_flags_come_last() {
        let fixture = ProjectFixture::new();
        let config = fixture.config(&["--make-flags=-j4 V=1"]);
        let runner = RecordingRunner::new();
        let revisions = FixedRevisions::new("abc");
        let ctx = BuildContext::new(&config, &fixture.project, &runner, &revisions);

        let cmd = make_command(&ctx, Path::new("/b"), ["-C", "out"]);
        assert_eq!(cmd.display_command(), "make -C out -j4 V=1");
    }

    #[test]
    fn test_empty_flags() {
        let fixture = ProjectFixture::new();
        let config = fixture.config(&["--make-flags="]);
        let runner = RecordingRunner::new();
        let revisions = FixedRevisions::new("abc");
        let ctx = BuildContext::new(&config, &fixture.project, &runner, &revisions);

        let cmd = make_command(&ctx, Path::new("/b"), Vec::<String>::new());
        assert_eq!(cmd.display_command(), "make");
    }
}
