//! Project - the source tree being built and its configuration file.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::options::BuildConfiguration;
use crate::resolver::{self, HostPlatform};
use crate::util::config::{ProjectConfig, PROJECT_FILE};

/// A project root plus its (possibly defaulted) `Dockyard.toml`.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
}

impl Project {
    /// Load the project at `root`. A missing `Dockyard.toml` means defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let config = ProjectConfig::load_or_default(&root.join(PROJECT_FILE))?;
        Ok(Project::new(root.to_path_buf(), config))
    }

    pub fn new(root: PathBuf, config: ProjectConfig) -> Self {
        Project { root, config }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Resolve the build configuration: `[defaults]` first, then `raw_args`.
    pub fn resolve_options<S: AsRef<str>>(&self, raw_args: &[S]) -> BuildConfiguration {
        self.resolve_options_for_host(raw_args, HostPlatform::detect())
    }

    pub fn resolve_options_for_host<S: AsRef<str>>(
        &self,
        raw_args: &[S],
        host: HostPlatform,
    ) -> BuildConfiguration {
        let mut args = self.config.default_args();
        args.extend(raw_args.iter().map(|a| a.as_ref().to_string()));
        resolver::resolve_for_host(&args, host)
    }

    /// Checkout of the async I/O dependency.
    pub fn async_io_checkout(&self) -> PathBuf {
        self.root.join(&self.config.paths.async_io)
    }

    /// Checkout of the VM core dependency.
    pub fn vm_core_checkout(&self) -> PathBuf {
        self.root.join(&self.config.paths.vm_core)
    }

    /// CMake toolchain file for a target tuple.
    pub fn toolchain_file(&self, config: &BuildConfiguration) -> PathBuf {
        self.root
            .join(&self.config.paths.toolchains)
            .join(format!("{}.cmake", config.target_tuple()))
    }

    pub fn tools_dir(&self) -> PathBuf {
        self.root.join(&self.config.paths.tools)
    }

    /// Embedded SDK root, resolved against the project root.
    pub fn embedded_home(&self, config: &BuildConfiguration) -> Option<PathBuf> {
        config.embedded_home().map(|home| self.root.join(home))
    }

    /// Build root: `<root>/<build-dir>/<arch>-<os>/<build-type>`.
    pub fn build_root(&self, config: &BuildConfiguration) -> PathBuf {
        self.root
            .join(config.build_dir())
            .join(config.target_tuple())
            .join(config.build_type().as_str())
    }

    /// Program used for a tool, as configured.
    pub fn cmake(&self) -> &str {
        &self.config.tools.cmake
    }

    pub fn make(&self) -> &str {
        &self.config.tools.make
    }

    pub fn git(&self) -> &str {
        &self.config.tools.git
    }

    /// Name of the runtime executable.
    pub fn runtime_name(&self) -> &str {
        &self.config.runtime.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::{TargetArch, TargetOs};
    use tempfile::TempDir;

    fn host() -> HostPlatform {
        HostPlatform::new(TargetArch::X86_64, TargetOs::Linux)
    }

    #[test]
    fn test_paths() {
        let tmp = TempDir::new().unwrap();
        let project = Project::load(tmp.path()).unwrap();
        let config = project.resolve_options_for_host(
            &["--target-arch=arm", "--target-os=nuttx", "--embedded-home=sdk/nuttx"],
            host(),
        );

        assert_eq!(project.async_io_checkout(), tmp.path().join("deps/libuv"));
        assert_eq!(project.vm_core_checkout(), tmp.path().join("deps/jerry"));
        assert_eq!(
            project.toolchain_file(&config),
            tmp.path().join("cmake/config/arm-nuttx.cmake")
        );
        assert_eq!(
            project.embedded_home(&config),
            Some(tmp.path().join("sdk/nuttx"))
        );
        assert_eq!(
            project.build_root(&config),
            tmp.path().join("build/arm-nuttx/debug")
        );
    }

    #[test]
    fn test_absolute_build_dir() {
        let tmp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let project = Project::load(tmp.path()).unwrap();
        let arg = format!("--build-dir={}", out.path().display());
        let config = project.resolve_options_for_host(&[arg.as_str(), "--build-type=release"], host());

        assert_eq!(
            project.build_root(&config),
            out.path().join("x86_64-linux/release")
        );
    }

    #[test]
    fn test_cli_options_override_file_defaults() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(PROJECT_FILE),
            "[defaults]\nbuild-type = \"release\"\nrun-tests = false\n",
        )
        .unwrap();

        let project = Project::load(tmp.path()).unwrap();

        let config = project.resolve_options_for_host::<&str>(&[], host());
        assert_eq!(config.build_type().as_str(), "release");
        assert!(!config.run_tests());

        let config = project.resolve_options_for_host(&["--build-type=debug"], host());
        assert_eq!(config.build_type().as_str(), "debug");
        assert!(!config.run_tests());
    }
}
