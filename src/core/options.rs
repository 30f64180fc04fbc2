//! Build configuration and its closed option enumerations.
//!
//! A [`BuildConfiguration`] is only produced by the option resolver
//! (`crate::resolver`) and is immutable afterwards. Every component reads it
//! through the accessors below.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

/// Build profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    #[default]
    Debug,
    Release,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "debug",
            BuildType::Release => "release",
        }
    }

    /// Capitalized form used by CMake and gyp (`Debug` / `Release`).
    pub fn native_name(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
        }
    }
}

impl FromStr for BuildType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            _ => Err(format!(
                "invalid build type '{}'; expected 'debug' or 'release'",
                s
            )),
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TargetArch {
    #[serde(rename = "x86_64")]
    X86_64,
    #[serde(rename = "i686")]
    I686,
    #[serde(rename = "arm")]
    Arm,
}

impl TargetArch {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetArch::X86_64 => "x86_64",
            TargetArch::I686 => "i686",
            TargetArch::Arm => "arm",
        }
    }

    /// The architecture of the running host, if it is one we can target.
    pub fn host() -> Option<Self> {
        match std::env::consts::ARCH {
            "x86_64" => Some(TargetArch::X86_64),
            "x86" => Some(TargetArch::I686),
            "arm" => Some(TargetArch::Arm),
            _ => None,
        }
    }
}

impl FromStr for TargetArch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x86_64" => Ok(TargetArch::X86_64),
            "i686" => Ok(TargetArch::I686),
            "arm" => Ok(TargetArch::Arm),
            _ => Err(format!(
                "invalid target arch '{}'; expected 'x86_64', 'i686', or 'arm'",
                s
            )),
        }
    }
}

impl fmt::Display for TargetArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    Linux,
    Darwin,
    /// NuttX embedded RTOS. Needs an SDK root (`embedded-home`).
    Nuttx,
}

impl TargetOs {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetOs::Linux => "linux",
            TargetOs::Darwin => "darwin",
            TargetOs::Nuttx => "nuttx",
        }
    }

    /// The operating system of the running host, if it is one we can target.
    pub fn host() -> Option<Self> {
        match std::env::consts::OS {
            "linux" => Some(TargetOs::Linux),
            "macos" => Some(TargetOs::Darwin),
            _ => None,
        }
    }
}

impl FromStr for TargetOs {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(TargetOs::Linux),
            "darwin" => Ok(TargetOs::Darwin),
            "nuttx" => Ok(TargetOs::Nuttx),
            _ => Err(format!(
                "invalid target os '{}'; expected 'linux', 'darwin', or 'nuttx'",
                s
            )),
        }
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved, immutable build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildConfiguration {
    pub(crate) build_type: BuildType,
    pub(crate) build_dir: PathBuf,
    pub(crate) build_as_library: bool,
    pub(crate) target_arch: TargetArch,
    pub(crate) target_os: TargetOs,
    pub(crate) make_flags: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) embedded_home: Option<PathBuf>,
    pub(crate) sync_submodules: bool,
    pub(crate) style_check: bool,
    pub(crate) memory_stats: bool,
    pub(crate) run_tests: bool,
}

impl BuildConfiguration {
    pub fn build_type(&self) -> BuildType {
        self.build_type
    }

    /// Build output directory, relative to the project root unless absolute.
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn build_as_library(&self) -> bool {
        self.build_as_library
    }

    pub fn target_arch(&self) -> TargetArch {
        self.target_arch
    }

    pub fn target_os(&self) -> TargetOs {
        self.target_os
    }

    /// Make flags split into separate arguments.
    pub fn make_flags(&self) -> Vec<&str> {
        self.make_flags.split_whitespace().collect()
    }

    /// Embedded SDK root, relative to the project root unless absolute.
    pub fn embedded_home(&self) -> Option<&Path> {
        self.embedded_home.as_deref()
    }

    pub fn sync_submodules(&self) -> bool {
        self.sync_submodules
    }

    pub fn style_check(&self) -> bool {
        self.style_check
    }

    /// Whether the memory-instrumented VM core is selected.
    ///
    /// Always false for release builds.
    pub fn memory_stats(&self) -> bool {
        self.memory_stats
    }

    pub fn run_tests(&self) -> bool {
        self.run_tests
    }

    /// `<arch>-<os>`, e.g. `x86_64-linux`.
    pub fn target_tuple(&self) -> String {
        format!("{}-{}", self.target_arch, self.target_os)
    }

    /// ARM cross build for NuttX.
    pub fn is_embedded_cross(&self) -> bool {
        self.target_arch == TargetArch::Arm && self.target_os == TargetOs::Nuttx
    }

    /// Whether the runtime is produced as a static library.
    ///
    /// NuttX images link the runtime in, so embedded cross builds always
    /// produce a library.
    pub fn produces_library(&self) -> bool {
        self.build_as_library || self.is_embedded_cross()
    }
}
