//! Revision-keyed artifact cache.
//!
//! Each dependency has a flat cache directory holding one file per
//! `(library, revision)` pair, named `<library>.<revision>`. When the
//! dependency checkouts were not synced the pinned revision cannot be
//! trusted: keys are then dirty, carry a `-dirty` suffix, and never count as
//! cached, so every such build rebuilds.
//!
//! Artifacts are staged next to their final name and renamed into place, so
//! an interrupted publish never leaves a truncated entry behind. Entries are
//! never removed by the build.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::util::fs::{copy_file, ensure_dir};

/// Suffix marking entries built from an unverified checkout.
pub const DIRTY_SUFFIX: &str = "-dirty";

/// Prefix of in-flight publish files; never listed or served.
const STAGING_PREFIX: &str = ".staging-";

/// Identity of one cached artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    library: String,
    revision: String,
    dirty: bool,
}

impl CacheKey {
    pub fn new(library: impl Into<String>, revision: impl Into<String>, dirty: bool) -> Self {
        CacheKey {
            library: library.into(),
            revision: revision.into(),
            dirty,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// File name inside the cache directory.
    pub fn file_name(&self) -> String {
        let suffix = if self.dirty { DIRTY_SUFFIX } else { "" };
        format!("{}.{}{}", self.library, self.revision, suffix)
    }
}

/// A file found in a cache directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    pub library: String,
    pub revision: String,
    pub dirty: bool,
    pub path: PathBuf,
    pub size: u64,
}

/// Cache directory of one dependency.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
    trusted: bool,
}

impl CacheStore {
    /// `trusted` is true when the checkouts were synced to their pinned
    /// revisions.
    pub fn new(dir: PathBuf, trusted: bool) -> Self {
        CacheStore { dir, trusted }
    }

    pub fn key_for(&self, library: &str, revision: &str) -> CacheKey {
        CacheKey::new(library, revision, !self.trusted)
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Whether `key` can be served from the cache.
    pub fn is_cached(&self, key: &CacheKey) -> bool {
        self.trusted && !key.is_dirty() && self.path_for(key).is_file()
    }

    /// Copy a freshly built artifact into the cache.
    pub fn publish(&self, key: &CacheKey, artifact: &Path) -> Result<PathBuf> {
        ensure_dir(&self.dir)?;
        let dest = self.path_for(key);

        let mut staged = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempfile_in(&self.dir)
            .with_context(|| format!("failed to stage artifact in {}", self.dir.display()))?;
        let mut source = File::open(artifact)
            .with_context(|| format!("failed to open artifact: {}", artifact.display()))?;
        io::copy(&mut source, staged.as_file_mut())
            .with_context(|| format!("failed to copy {} into the cache", artifact.display()))?;
        staged
            .persist(&dest)
            .with_context(|| format!("failed to publish {}", dest.display()))?;

        tracing::debug!("cached {} as {}", artifact.display(), dest.display());
        Ok(dest)
    }

    /// Copy a cached artifact to `<libs_dir>/lib<library>.a`.
    pub fn materialize(&self, key: &CacheKey, library: &str, libs_dir: &Path) -> Result<PathBuf> {
        ensure_dir(libs_dir)?;
        let dest = libs_dir.join(format!("lib{}.a", library));
        copy_file(&self.path_for(key), &dest)?;
        Ok(dest)
    }

    /// List the entries currently in the cache, sorted by file name.
    pub fn entries(&self) -> Result<Vec<CacheEntry>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("failed to read directory: {}", self.dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let Some((library, revision)) = name.rsplit_once('.') else {
                continue;
            };
            let (revision, dirty) = match revision.strip_suffix(DIRTY_SUFFIX) {
                Some(revision) => (revision, true),
                None => (revision, false),
            };

            entries.push(CacheEntry {
                library: library.to_string(),
                revision: revision.to_string(),
                dirty,
                size: entry.metadata()?.len(),
                path,
            });
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const REV: &str = "0123abcd";

    fn artifact(tmp: &TempDir, content: &str) -> PathBuf {
        let path = tmp.path().join("out").join("libthing.a");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_key_file_names() {
        assert_eq!(CacheKey::new("uv", REV, false).file_name(), "uv.0123abcd");
        assert_eq!(
            CacheKey::new("jerrycore-mem_stats", REV, true).file_name(),
            "jerrycore-mem_stats.0123abcd-dirty"
        );
    }

    #[test]
    fn test_publish_then_cached() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path().join("cache"), true);
        let key = store.key_for("uv", REV);

        assert!(!key.is_dirty());
        assert!(!store.is_cached(&key));

        let cached = store.publish(&key, &artifact(&tmp, "v1")).unwrap();
        assert_eq!(cached, tmp.path().join("cache/uv.0123abcd"));
        assert!(store.is_cached(&key));

        // A different revision is a miss
        assert!(!store.is_cached(&store.key_for("uv", "ffff")));
    }

    #[test]
    fn test_untrusted_store_never_hits() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path().join("cache"), false);
        let key = store.key_for("uv", REV);

        assert!(key.is_dirty());
        store.publish(&key, &artifact(&tmp, "v1")).unwrap();

        assert!(store.path_for(&key).is_file());
        assert!(!store.is_cached(&key));
    }

    #[test]
    fn test_dirty_entry_does_not_satisfy_clean_key() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("cache");

        let dirty_store = CacheStore::new(dir.clone(), false);
        dirty_store
            .publish(&dirty_store.key_for("uv", REV), &artifact(&tmp, "dirty"))
            .unwrap();

        let clean_store = CacheStore::new(dir, true);
        assert!(!clean_store.is_cached(&clean_store.key_for("uv", REV)));
    }

    #[test]
    fn test_interrupted_publish_is_not_cached() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path().join("cache"), true);
        let key = store.key_for("uv", REV);

        // Left behind by a publish killed mid-copy
        fs::create_dir_all(tmp.path().join("cache")).unwrap();
        let leftover = tmp.path().join("cache").join(format!("{}uv.{}", STAGING_PREFIX, REV));
        fs::write(&leftover, "trunc").unwrap();

        assert!(!store.is_cached(&key));
        assert!(store.entries().unwrap().is_empty());

        store.publish(&key, &artifact(&tmp, "complete")).unwrap();
        assert!(store.is_cached(&key));
        assert_eq!(fs::read_to_string(store.path_for(&key)).unwrap(), "complete");

        let staged: Vec<_> = fs::read_dir(tmp.path().join("cache"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(STAGING_PREFIX))
            .collect();
        assert_eq!(staged.len(), 1, "only the old leftover remains: {:?}", staged);
    }

    #[test]
    fn test_republish_replaces_entry() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path().join("cache"), false);
        let key = store.key_for("uv", REV);

        store.publish(&key, &artifact(&tmp, "first")).unwrap();
        store.publish(&key, &artifact(&tmp, "second")).unwrap();

        assert_eq!(fs::read_to_string(store.path_for(&key)).unwrap(), "second");
    }

    #[test]
    fn test_materialize_normalizes_name() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path().join("cache"), true);
        let key = store.key_for("jerrycore-mem_stats", REV);
        store.publish(&key, &artifact(&tmp, "core")).unwrap();

        let libs = tmp.path().join("libs");
        let dest = store.materialize(&key, "jerrycore", &libs).unwrap();

        assert_eq!(dest, libs.join("libjerrycore.a"));
        assert_eq!(fs::read_to_string(dest).unwrap(), "core");
    }

    #[test]
    fn test_entries() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path().join("cache"), true);
        assert!(store.entries().unwrap().is_empty());

        store
            .publish(&store.key_for("uv", REV), &artifact(&tmp, "abc"))
            .unwrap();
        let dirty = CacheKey::new("fdlibm", REV, true);
        store.publish(&dirty, &artifact(&tmp, "abcdef")).unwrap();

        let entries = store.entries().unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].library, "fdlibm");
        assert!(entries[0].dirty);
        assert_eq!(entries[0].revision, REV);
        assert_eq!(entries[0].size, 6);

        assert_eq!(entries[1].library, "uv");
        assert!(!entries[1].dirty);
    }
}
