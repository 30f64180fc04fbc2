//! CMake configure invocations.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::builder::context::BuildContext;
use crate::builder::errors::BuildError;
use crate::util::process::ProcessBuilder;

/// A `cmake <source> -D...` configure step run inside a build directory.
#[derive(Debug, Clone)]
pub struct CMakeConfigure {
    program: String,
    source_dir: PathBuf,
    build_dir: PathBuf,
    defines: Vec<(String, OsString)>,
}

impl CMakeConfigure {
    /// Configure `source_dir` into `build_dir` with the project's cmake.
    pub fn new(ctx: &BuildContext, source_dir: &Path, build_dir: &Path) -> Self {
        CMakeConfigure {
            program: ctx.project.cmake().to_string(),
            source_dir: source_dir.to_path_buf(),
            build_dir: build_dir.to_path_buf(),
            defines: Vec::new(),
        }
    }

    /// Add a `-D<key>=<value>` cache entry.
    pub fn define(mut self, key: impl Into<String>, value: impl AsRef<Path>) -> Self {
        self.defines
            .push((key.into(), value.as_ref().as_os_str().to_os_string()));
        self
    }

    /// Add a define only when `condition` holds.
    pub fn define_if(self, condition: bool, key: impl Into<String>, value: impl AsRef<Path>) -> Self {
        if condition {
            self.define(key, value)
        } else {
            self
        }
    }

    pub fn command(&self) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .arg(&self.source_dir)
            .args(self.defines.iter().map(|(k, v)| {
                let mut define = OsString::from(format!("-D{}=", k));
                define.push(v);
                define
            }))
            .cwd(&self.build_dir)
    }
}

/// Run a generator twice in a row.
///
/// On a fresh build directory CMake does not recognize cross targets on the
/// first run ("System is unknown to cmake") and drops part of the
/// configuration; the second run with identical arguments applies it. The
/// step is idempotent, so it is also applied to already configured trees.
pub fn configure_with_detection_workaround(
    ctx: &BuildContext,
    cmd: &ProcessBuilder,
) -> Result<(), BuildError> {
    ctx.run(cmd)?;
    ctx.run(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixedRevisions, ProjectFixture, RecordingRunner};

    #[test]
    fn test_configure_command() {
        let fixture = ProjectFixture::new();
        let config = fixture.config(&[]);
        let runner = RecordingRunner::new();
        let revisions = FixedRevisions::new("abc");
        let ctx = BuildContext::new(&config, &fixture.project, &runner, &revisions);

        let cmd = CMakeConfigure::new(&ctx, Path::new("/src/jerry"), Path::new("/build/jerry"))
            .define("ENABLE_LTO", "OFF")
            .define_if(false, "PLATFORM_EXT", "NUTTX")
            .command();

        assert_eq!(cmd.display_command(), "cmake /src/jerry -DENABLE_LTO=OFF");
        assert_eq!(cmd.get_cwd(), Some(Path::new("/build/jerry")));
    }

    #[cfg(unix)]
    #[test]
    fn test_define_keeps_non_utf8_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let fixture = ProjectFixture::new();
        let config = fixture.config(&[]);
        let runner = RecordingRunner::new();
        let revisions = FixedRevisions::new("abc");
        let ctx = BuildContext::new(&config, &fixture.project, &runner, &revisions);

        let home = Path::new(OsStr::from_bytes(b"/opt/nuttx-\xfe"));
        let cmd = CMakeConfigure::new(&ctx, Path::new("/src"), Path::new("/build"))
            .define("NUTTX_HOME", home)
            .command();

        assert_eq!(cmd.get_args()[1].as_bytes(), b"-DNUTTX_HOME=/opt/nuttx-\xfe");
    }

    #[test]
    fn test_workaround_runs_generator_twice() {
        let fixture = ProjectFixture::new();
        let config = fixture.config(&[]);
        let runner = RecordingRunner::new();
        let revisions = FixedRevisions::new("abc");
        let ctx = BuildContext::new(&config, &fixture.project, &runner, &revisions);

        let cmd = ProcessBuilder::new("cmake").arg("/src");
        configure_with_detection_workaround(&ctx, &cmd).unwrap();

        assert_eq!(runner.calls(), vec!["cmake /src", "cmake /src"]);
    }

    #[test]
    fn test_workaround_stops_on_first_failure() {
        let fixture = ProjectFixture::new();
        let config = fixture.config(&[]);
        let runner = RecordingRunner::new().fail_on("cmake", 1);
        let revisions = FixedRevisions::new("abc");
        let ctx = BuildContext::new(&config, &fixture.project, &runner, &revisions);

        let err = configure_with_detection_workaround(&ctx, &ProcessBuilder::new("cmake"))
            .unwrap_err();

        assert!(matches!(
            err,
            BuildError::ToolchainInvocationFailed {
                exit_code: Some(1),
                ..
            }
        ));
        assert_eq!(runner.calls().len(), 1);
    }
}
