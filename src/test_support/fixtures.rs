//! Project fixtures and fake tool behavior.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::{CommandPattern, RecordingRunner};
use crate::core::options::{TargetArch, TargetOs};
use crate::core::{BuildConfiguration, Project};
use crate::resolver::HostPlatform;
use crate::util::config::PROJECT_FILE;
use crate::util::process::{ProcessBuilder, ToolOutcome};

/// A project root in a temp directory with both dependency checkouts.
pub struct ProjectFixture {
    tmp: TempDir,
    pub project: Project,
}

impl ProjectFixture {
    pub fn new() -> Self {
        ProjectFixture::with_config("")
    }

    /// Fixture whose `Dockyard.toml` holds `config`. Empty means no file.
    pub fn with_config(config: &str) -> Self {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        for dir in ["deps/libuv", "deps/jerry", "tools", "cmake/config"] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        if !config.is_empty() {
            fs::write(root.join(PROJECT_FILE), config).unwrap();
        }

        let project = Project::load(root).unwrap();
        ProjectFixture { tmp, project }
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    /// Resolve options as on an x86_64 Linux host.
    pub fn config(&self, args: &[&str]) -> BuildConfiguration {
        self.project.resolve_options_for_host(
            args,
            HostPlatform::new(TargetArch::X86_64, TargetOs::Linux),
        )
    }
}

impl RecordingRunner {
    /// A runner whose `make` leaves behind the artifacts a real build would.
    pub fn with_fake_tools(runtime_name: &str) -> Self {
        RecordingRunner::new().respond(
            CommandPattern::Program("make".to_string()),
            fake_make(runtime_name),
        )
    }
}

/// Fake `make` writing the expected output files.
///
/// - `... BUILDTYPE=<T>`: `<cwd>/out/<T>/libuv.a`
/// - `-C <dir> <target>`: `<dir>/<output dir>/lib<target>.a`
/// - anything else: the runtime executable and library in `<cwd>`
pub fn fake_make(runtime_name: &str) -> impl Fn(&ProcessBuilder) -> ToolOutcome + 'static {
    let runtime_name = runtime_name.to_string();

    move |cmd| {
        let cwd = cmd.get_cwd().map(Path::to_path_buf).unwrap_or_default();
        let args: Vec<String> = cmd
            .get_args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        let outputs: Vec<PathBuf> =
            if let Some(build_type) = args.iter().find_map(|a| a.strip_prefix("BUILDTYPE=")) {
                vec![cwd.join("out").join(build_type).join("libuv.a")]
            } else if let Some(pos) = args.iter().position(|a| a == "-C") {
                let dir = PathBuf::from(&args[pos + 1]);
                let target = &args[pos + 2];
                let output_dir = if target.ends_with(".jerry-core") {
                    "jerry-core"
                } else {
                    "third-party/fdlibm"
                };
                vec![dir.join(output_dir).join(format!("lib{}.a", target))]
            } else {
                vec![
                    cwd.join(&runtime_name),
                    cwd.join(format!("lib{}.a", runtime_name)),
                ]
            };

        for output in outputs {
            fs::create_dir_all(output.parent().unwrap()).unwrap();
            fs::write(&output, cmd.display_command()).unwrap();
        }

        ToolOutcome::success()
    }
}
