//! Persist checksum lists to disk (JSON array under a cache directory) so a
//! fetched or validated set survives across runs.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::checksums::{ChecksumSet, KnownChecksums, KnownEntry};

/// File name used for checksums fetched from the Gradle services API.
pub const FETCHED_FILE_NAME: &str = "fetched-checksums.json";

/// File name used for checksums of wrappers that passed validation.
pub const VALIDATED_FILE_NAME: &str = "valid-wrappers.json";

/// A checksum list stored as `<dir>/<file name>`.
#[derive(Debug, Clone)]
pub struct ChecksumCache {
    dir: PathBuf,
    file: PathBuf,
}

impl ChecksumCache {
    /// Cache of fetched checksums under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_file_name(dir, FETCHED_FILE_NAME)
    }

    pub fn with_file_name(dir: impl Into<PathBuf>, file_name: &str) -> Self {
        let dir = dir.into();
        let file = dir.join(file_name);
        Self { dir, file }
    }

    /// Default cache directory: `~/.local/state/gwv/cache`.
    pub fn default_dir() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("gwv")?;
        Ok(xdg_dirs.get_state_home().join("gwv").join("cache"))
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    /// Load the persisted set. A missing file yields an empty set; an unreadable
    /// or malformed file is an error.
    pub fn load(&self) -> Result<ChecksumSet> {
        Ok(self.load_known()?.checksums().clone())
    }

    /// Load the persisted list together with any version tags. Accepts both
    /// plain digests and `{"version", "checksum"}` entries.
    pub fn load_known(&self) -> Result<KnownChecksums> {
        let bytes = match std::fs::read(&self.file) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(KnownChecksums::new())
            }
            Err(e) => {
                return Err(e).with_context(|| format!("read checksum cache: {}", self.file.display()))
            }
        };
        let list: Vec<CachedEntry> = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse checksum cache: {}", self.file.display()))?;
        Ok(list
            .into_iter()
            .map(|e| match e {
                CachedEntry::Plain(checksum) => KnownEntry {
                    version: None,
                    checksum,
                },
                CachedEntry::Known(entry) => entry,
            })
            .collect())
    }

    /// Replace the cache contents with `checksums` (first occurrence wins on
    /// duplicates).
    pub fn save<S: AsRef<str>>(&self, checksums: &[S]) -> Result<()> {
        let mut seen = HashSet::new();
        let unique: Vec<&str> = checksums
            .iter()
            .map(|c| c.as_ref())
            .filter(|c| seen.insert(*c))
            .collect();
        let json = serde_json::to_string_pretty(&unique).context("serialize checksum cache")?;
        self.write_atomic(&json)?;
        tracing::debug!("saved {} checksums to {}", unique.len(), self.file.display());
        Ok(())
    }

    /// Save every member of `set` in sorted order.
    pub fn save_set(&self, set: &ChecksumSet) -> Result<()> {
        self.save(&set.to_vec())
    }

    /// Replace the cache contents with `known`, keeping version tags so later
    /// fetches can skip versions already stored.
    pub fn save_known(&self, known: &KnownChecksums) -> Result<()> {
        let entries = known.entries();
        let json = serde_json::to_string_pretty(&entries).context("serialize checksum cache")?;
        self.write_atomic(&json)?;
        tracing::debug!(
            "saved {} checksums ({} versions) to {}",
            entries.len(),
            known.version_count(),
            self.file.display()
        );
        Ok(())
    }

    /// Write a temp file in the cache dir and rename it over the target, so
    /// readers never see a partial file.
    fn write_atomic(&self, json: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create dir: {}", self.dir.display()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("create temp file in {}", self.dir.display()))?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .with_context(|| format!("write checksum cache: {}", self.file.display()))?;
        tmp.persist(&self.file)
            .with_context(|| format!("replace checksum cache: {}", self.file.display()))?;
        Ok(())
    }
}

/// One element of a cache file: older files hold bare digests.
#[derive(Deserialize)]
#[serde(untagged)]
enum CachedEntry {
    Plain(String),
    Known(KnownEntry),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ChecksumCache::new(dir.path().join("never-written"));
        assert!(cache.load().unwrap().is_empty());
        assert!(!dir.path().join("never-written").exists());
    }

    #[test]
    fn save_then_load_roundtrip_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("nested").join("wrapper-validation-cache");
        let cache = ChecksumCache::new(&cache_dir);

        cache.save(&["123", "456"]).unwrap();

        assert!(cache_dir.exists());
        let loaded = cache.load().unwrap();
        assert_eq!(loaded.to_vec(), vec!["123", "456"]);
    }

    #[test]
    fn save_is_idempotent_and_deduplicates() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ChecksumCache::new(dir.path());
        cache.save(&["b", "a", "b"]).unwrap();
        let first = std::fs::read_to_string(cache.path()).unwrap();
        cache.save(&["b", "a", "b"]).unwrap();
        let second = std::fs::read_to_string(cache.path()).unwrap();
        assert_eq!(first, second);

        let on_disk: Vec<String> = serde_json::from_str(&first).unwrap();
        assert_eq!(on_disk, vec!["b", "a"]);
    }

    #[test]
    fn save_overwrites_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ChecksumCache::new(dir.path());
        cache.save(&["old"]).unwrap();
        cache.save(&["new"]).unwrap();
        let loaded = cache.load().unwrap();
        assert!(loaded.contains("new"));
        assert!(!loaded.contains("old"));
        // Only the cache file remains; temp files were renamed away.
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn load_malformed_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ChecksumCache::new(dir.path());
        std::fs::write(cache.path(), b"{not json").unwrap();
        assert!(cache.load().is_err());
    }

    #[test]
    fn known_roundtrip_keeps_versions() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ChecksumCache::new(dir.path());
        let mut known = KnownChecksums::new();
        known.add(Some("8.5"), "bb");
        known.add(None, "aa");

        cache.save_known(&known).unwrap();

        let loaded = cache.load_known().unwrap();
        assert_eq!(loaded, known);
        assert!(loaded.has_version("8.5"));
        assert_eq!(cache.load().unwrap().to_vec(), vec!["aa", "bb"]);
    }

    #[test]
    fn plain_digest_list_loads_without_versions() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ChecksumCache::new(dir.path());
        cache.save(&["aa", "bb"]).unwrap();

        let loaded = cache.load_known().unwrap();
        assert_eq!(loaded.version_count(), 0);
        assert_eq!(loaded.checksums().to_vec(), vec!["aa", "bb"]);
    }

    #[test]
    fn file_names_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let fetched = ChecksumCache::new(dir.path());
        let validated = ChecksumCache::with_file_name(dir.path(), VALIDATED_FILE_NAME);
        fetched.save(&["aa"]).unwrap();
        assert!(validated.load().unwrap().is_empty());
        assert_eq!(validated.path(), dir.path().join("valid-wrappers.json"));
    }
}
