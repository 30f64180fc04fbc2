//! Project configuration file support.
//!
//! A project may carry a `Dockyard.toml` at its root. Every section is
//! optional; missing keys take the defaults below, which match the usual
//! checkout layout:
//!
//! ```toml
//! [defaults]            # raw build options, applied before CLI options
//! build-type = "debug"
//!
//! [paths]
//! async-io = "deps/libuv"
//! vm-core = "deps/jerry"
//! toolchains = "cmake/config"
//! tools = "tools"
//!
//! [tools]
//! cmake = "cmake"
//! make = "make"
//! git = "git"
//!
//! [hooks]
//! style-check = ["python", "tools/check_tidy.py"]
//! codegen = ["perl", "js2c.pl"]
//! test-harness = ["python", "tools/check_test.py"]
//!
//! [runtime]
//! name = "iotjs"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the project configuration file.
pub const PROJECT_FILE: &str = "Dockyard.toml";

/// Contents of `Dockyard.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProjectConfig {
    /// Build options applied before the command line ones
    pub defaults: BTreeMap<String, toml::Value>,

    /// Source and tool locations
    pub paths: PathsConfig,

    /// External tool programs
    pub tools: ToolsConfig,

    /// Collaborator commands
    pub hooks: HooksConfig,

    /// Final runtime settings
    pub runtime: RuntimeConfig,
}

/// Locations relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PathsConfig {
    /// Async I/O dependency checkout
    pub async_io: PathBuf,

    /// VM core dependency checkout
    pub vm_core: PathBuf,

    /// Directory holding `<arch>-<os>.cmake` toolchain files
    pub toolchains: PathBuf,

    /// Directory the code generator runs in
    pub tools: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            async_io: PathBuf::from("deps/libuv"),
            vm_core: PathBuf::from("deps/jerry"),
            toolchains: PathBuf::from("cmake/config"),
            tools: PathBuf::from("tools"),
        }
    }
}

/// External programs. Bare names are looked up in `PATH`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToolsConfig {
    pub cmake: String,
    pub make: String,
    pub git: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            cmake: "cmake".to_string(),
            make: "make".to_string(),
            git: "git".to_string(),
        }
    }
}

/// Collaborator commands as argument vectors.
///
/// An empty vector disables the hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HooksConfig {
    /// Style checker, called with the project root appended
    pub style_check: Vec<String>,

    /// Script bundler, run from the tools directory
    pub codegen: Vec<String>,

    /// Test harness, called with the runtime executable appended
    pub test_harness: Vec<String>,
}

impl Default for HooksConfig {
    fn default() -> Self {
        HooksConfig {
            style_check: vec!["python".to_string(), "tools/check_tidy.py".to_string()],
            codegen: vec!["perl".to_string(), "js2c.pl".to_string()],
            test_harness: vec!["python".to_string(), "tools/check_test.py".to_string()],
        }
    }
}

/// Final runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Executable name; the library form is `lib<name>.a`
    pub name: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            name: "iotjs".to_string(),
        }
    }
}

impl ProjectConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load a configuration file, or the defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(ProjectConfig::default())
        }
    }

    /// The `[defaults]` table rendered as raw `--key=value` options.
    ///
    /// Arrays and tables have no option form and are skipped.
    pub fn default_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for (key, value) in &self.defaults {
            let rendered = match value {
                toml::Value::String(s) => s.clone(),
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Integer(i) => i.to_string(),
                other => {
                    tracing::debug!("ignoring default `{}` with value {}", key, other);
                    continue;
                }
            };
            args.push(format!("--{}={}", key, rendered));
        }
        args
    }
}
