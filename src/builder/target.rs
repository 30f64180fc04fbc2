//! Build targets of a dependency.

use std::path::{Path, PathBuf};

use crate::builder::cache::{CacheKey, CacheStore};
use crate::core::options::BuildType;

/// Static description of a library a dependency can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSpec {
    /// Library name; the shared libs copy is `lib<name>.a`
    pub name: &'static str,
    /// Variant suffix, e.g. `-mem_stats`; empty for the normal build
    pub variant: &'static str,
    /// Target name known to the native build tool
    pub native_name: &'static str,
    /// Output subdirectory, relative to the dependency's build directory
    pub output_dir: &'static str,
}

/// A target resolved against a revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    name: String,
    variant: String,
    native_name: String,
    output_dir: PathBuf,
    key: CacheKey,
}

impl BuildTarget {
    pub fn resolve(spec: &TargetSpec, cache: &CacheStore, revision: &str) -> Self {
        let key = cache.key_for(&format!("{}{}", spec.name, spec.variant), revision);
        BuildTarget {
            name: spec.name.to_string(),
            variant: spec.variant.to_string(),
            native_name: spec.native_name.to_string(),
            output_dir: PathBuf::from(spec.output_dir),
            key,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn native_name(&self) -> &str {
        &self.native_name
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Cache key. Variants are cached under `<name><variant>` so they never
    /// share a slot with the normal build.
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// `{buildType}{variant}.{nativeName}`, e.g. `debug-mem_stats.jerry-core`.
    pub fn native_target(&self, build_type: BuildType) -> String {
        format!("{}{}.{}", build_type.as_str(), self.variant, self.native_name)
    }

    /// Label for logs: name plus variant.
    pub fn label(&self) -> String {
        format!("{}{}", self.name, self.variant)
    }
}
