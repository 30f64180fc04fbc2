//! Option resolution.
//!
//! Raw options have the form `--key`, `--no-key` or `--key=value`. They are
//! applied in order on top of the defaults, so later options win. Keys and
//! enumerated values are case-insensitive.
//!
//! Resolution is lenient: unknown keys, values outside an option's
//! enumeration, and anything not starting with `--` are dropped (logged at
//! debug level) and the previous value stays in place. This keeps older and
//! newer option sets interchangeable, at the cost of a typo silently falling
//! back to the default. `dockyard config` prints the resolved values so a
//! dropped option can be spotted.
//!
//! After all options are applied, a release build always has memory
//! statistics disabled, whatever was requested.

use std::path::PathBuf;

use crate::core::options::{BuildConfiguration, BuildType, TargetArch, TargetOs};

/// Default build output directory.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Default flags handed to the native build tool.
pub const DEFAULT_MAKE_FLAGS: &str = "-j";

/// Architecture and OS the defaults are derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostPlatform {
    pub arch: TargetArch,
    pub os: TargetOs,
}

impl HostPlatform {
    pub fn new(arch: TargetArch, os: TargetOs) -> Self {
        HostPlatform { arch, os }
    }

    /// Detect the running host.
    ///
    /// Hosts outside the supported enumerations fall back to `x86_64` and
    /// `linux`.
    pub fn detect() -> Self {
        let arch = TargetArch::host().unwrap_or_else(|| {
            tracing::warn!(
                "host architecture `{}` is not a supported target, defaulting to x86_64",
                std::env::consts::ARCH
            );
            TargetArch::X86_64
        });
        let os = TargetOs::host().unwrap_or_else(|| {
            tracing::warn!(
                "host os `{}` is not a supported target, defaulting to linux",
                std::env::consts::OS
            );
            TargetOs::Linux
        });

        HostPlatform { arch, os }
    }
}

/// Resolve raw options against the detected host.
pub fn resolve<S: AsRef<str>>(raw_args: &[S]) -> BuildConfiguration {
    resolve_for_host(raw_args, HostPlatform::detect())
}

/// Resolve raw options with explicit host defaults.
pub fn resolve_for_host<S: AsRef<str>>(raw_args: &[S], host: HostPlatform) -> BuildConfiguration {
    let mut options = OptionSet::defaults(host);
    for arg in raw_args {
        options.apply(arg.as_ref());
    }
    options.finish()
}

/// Recognized option keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionKey {
    BuildType,
    BuildDir,
    BuildAsLibrary,
    TargetArch,
    TargetOs,
    MakeFlags,
    EmbeddedHome,
    SyncSubmodules,
    StyleCheck,
    MemoryStats,
    RunTests,
}

impl OptionKey {
    fn lookup(name: &str) -> Option<Self> {
        let key = match name {
            "build-type" | "buildtype" => OptionKey::BuildType,
            "build-dir" | "builddir" => OptionKey::BuildDir,
            "build-as-library" | "buildlib" => OptionKey::BuildAsLibrary,
            "target-arch" => OptionKey::TargetArch,
            "target-os" => OptionKey::TargetOs,
            "make-flags" => OptionKey::MakeFlags,
            "embedded-home" | "nuttx-home" => OptionKey::EmbeddedHome,
            "sync-submodules" | "init-submodule" => OptionKey::SyncSubmodules,
            "style-check" | "tidy" => OptionKey::StyleCheck,
            "memory-stats" | "jerry-memstats" => OptionKey::MemoryStats,
            "run-tests" | "checktest" => OptionKey::RunTests,
            _ => return None,
        };
        Some(key)
    }

    fn is_switch(self) -> bool {
        matches!(
            self,
            OptionKey::BuildAsLibrary
                | OptionKey::SyncSubmodules
                | OptionKey::StyleCheck
                | OptionKey::MemoryStats
                | OptionKey::RunTests
        )
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Mutable working copy of the options while they are being applied.
#[derive(Debug, Clone)]
struct OptionSet {
    build_type: BuildType,
    build_dir: PathBuf,
    build_as_library: bool,
    target_arch: TargetArch,
    target_os: TargetOs,
    make_flags: String,
    embedded_home: Option<PathBuf>,
    sync_submodules: bool,
    style_check: bool,
    memory_stats: bool,
    run_tests: bool,
}

impl OptionSet {
    fn defaults(host: HostPlatform) -> Self {
        OptionSet {
            build_type: BuildType::Debug,
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
            build_as_library: false,
            target_arch: host.arch,
            target_os: host.os,
            make_flags: DEFAULT_MAKE_FLAGS.to_string(),
            embedded_home: None,
            sync_submodules: true,
            style_check: true,
            memory_stats: false,
            run_tests: true,
        }
    }

    fn apply(&mut self, arg: &str) {
        let Some(body) = arg.strip_prefix("--") else {
            tracing::debug!("ignoring argument `{}`", arg);
            return;
        };

        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name.to_lowercase(), Some(value)),
            None => (body.to_lowercase(), None),
        };

        if let Some(key) = OptionKey::lookup(&name) {
            if !self.set(key, value) {
                tracing::debug!("dropping invalid value in `{}`", arg);
            }
            return;
        }

        let negated = name
            .strip_prefix("no-")
            .and_then(OptionKey::lookup)
            .filter(|key| key.is_switch());

        match (negated, value) {
            (Some(key), None) => self.set_switch(key, false),
            _ => tracing::debug!("dropping unknown option `{}`", arg),
        }
    }

    /// Apply one option. Returns false when the value was dropped.
    fn set(&mut self, key: OptionKey, value: Option<&str>) -> bool {
        if key.is_switch() {
            let enabled = match value {
                None => true,
                Some(v) => match parse_switch(v) {
                    Some(enabled) => enabled,
                    None => return false,
                },
            };
            self.set_switch(key, enabled);
            return true;
        }

        let Some(value) = value else {
            return false;
        };

        match key {
            OptionKey::BuildType => match value.parse() {
                Ok(build_type) => self.build_type = build_type,
                Err(_) => return false,
            },
            OptionKey::TargetArch => match value.parse() {
                Ok(arch) => self.target_arch = arch,
                Err(_) => return false,
            },
            OptionKey::TargetOs => match value.parse() {
                Ok(os) => self.target_os = os,
                Err(_) => return false,
            },
            OptionKey::BuildDir => {
                if value.is_empty() {
                    return false;
                }
                self.build_dir = PathBuf::from(value);
            }
            OptionKey::MakeFlags => self.make_flags = value.to_string(),
            OptionKey::EmbeddedHome => {
                self.embedded_home = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            _ => return false,
        }

        true
    }

    fn set_switch(&mut self, key: OptionKey, enabled: bool) {
        match key {
            OptionKey::BuildAsLibrary => self.build_as_library = enabled,
            OptionKey::SyncSubmodules => self.sync_submodules = enabled,
            OptionKey::StyleCheck => self.style_check = enabled,
            OptionKey::MemoryStats => self.memory_stats = enabled,
            OptionKey::RunTests => self.run_tests = enabled,
            _ => {}
        }
    }

    fn finish(self) -> BuildConfiguration {
        let memory_stats = self.memory_stats && self.build_type != BuildType::Release;
        if self.memory_stats && !memory_stats {
            tracing::debug!("memory statistics are not available in release builds");
        }

        BuildConfiguration {
            build_type: self.build_type,
            build_dir: self.build_dir,
            build_as_library: self.build_as_library,
            target_arch: self.target_arch,
            target_os: self.target_os,
            make_flags: self.make_flags,
            embedded_home: self.embedded_home,
            sync_submodules: self.sync_submodules,
            style_check: self.style_check,
            memory_stats,
            run_tests: self.run_tests,
        }
    }
}
