//! Trusted checksum sets.
//!
//! - [`ChecksumSet`]: plain membership set of hex digests (normalized to
//!   lowercase on insert)
//! - [`KnownChecksums`]: digests plus the Gradle versions they were taken from,
//!   so a remote fetch can skip versions that are already covered
//! - [`builtin`]: the list shipped with this crate, parsed once per process

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::btree_set;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

const BUILTIN_JSON: &str = include_str!("known_checksums.json");

/// Set of known-good SHA-256 hex digests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumSet {
    inner: BTreeSet<String>,
}

impl ChecksumSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a digest. Surrounding whitespace is trimmed and hex is lowercased;
    /// blank input is ignored.
    pub fn insert(&mut self, checksum: &str) -> bool {
        let normalized = checksum.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return false;
        }
        self.inner.insert(normalized)
    }

    pub fn contains(&self, checksum: &str) -> bool {
        self.inner.contains(checksum)
    }

    /// True if every digest yielded by `checksums` is in the set.
    pub fn contains_all<'a, I>(&self, checksums: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        checksums.into_iter().all(|c| self.contains(c))
    }

    /// Add every member of `other`.
    pub fn union_with(&mut self, other: &ChecksumSet) {
        self.inner.extend(other.inner.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Members in sorted order.
    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.inner.iter()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.inner.iter().cloned().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ChecksumSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut set = ChecksumSet::new();
        set.extend(iter);
        set
    }
}

impl<S: AsRef<str>> Extend<S> for ChecksumSet {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        for c in iter {
            self.insert(c.as_ref());
        }
    }
}

impl<'a> IntoIterator for &'a ChecksumSet {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One entry of a known-checksums list (built-in JSON or `known-checksums` output).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownEntry {
    /// Gradle version the wrapper JAR shipped with, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub checksum: String,
}

/// Checksums together with the Gradle versions they cover.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownChecksums {
    checksums: ChecksumSet,
    /// Version -> normalized checksum.
    versions: BTreeMap<String, String>,
}

impl KnownChecksums {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a checksum, optionally tagged with the version it belongs to.
    pub fn add(&mut self, version: Option<&str>, checksum: &str) {
        let normalized = checksum.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return;
        }
        self.checksums.insert(&normalized);
        if let Some(v) = version {
            self.versions.insert(v.to_string(), normalized);
        }
    }

    pub fn checksums(&self) -> &ChecksumSet {
        &self.checksums
    }

    pub fn has_version(&self, version: &str) -> bool {
        self.versions.contains_key(version)
    }

    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    /// Add every checksum and version of `other`.
    pub fn merge(&mut self, other: &KnownChecksums) {
        self.checksums.union_with(&other.checksums);
        self.versions
            .extend(other.versions.iter().map(|(v, c)| (v.clone(), c.clone())));
    }

    /// Versioned entries (sorted by version), then checksums no version claims.
    pub fn entries(&self) -> Vec<KnownEntry> {
        let mut entries: Vec<KnownEntry> = self
            .versions
            .iter()
            .map(|(v, c)| KnownEntry {
                version: Some(v.clone()),
                checksum: c.clone(),
            })
            .collect();
        let claimed: BTreeSet<&str> = self.versions.values().map(String::as_str).collect();
        entries.extend(
            self.checksums
                .iter()
                .filter(|c| !claimed.contains(c.as_str()))
                .map(|c| KnownEntry {
                    version: None,
                    checksum: c.clone(),
                }),
        );
        entries
    }

    /// Parse a JSON array of [`KnownEntry`].
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<KnownEntry> =
            serde_json::from_str(json).context("parse known checksums list")?;
        Ok(entries.into_iter().collect())
    }
}

impl FromIterator<KnownEntry> for KnownChecksums {
    fn from_iter<T: IntoIterator<Item = KnownEntry>>(iter: T) -> Self {
        let mut known = KnownChecksums::new();
        for e in iter {
            known.add(e.version.as_deref(), &e.checksum);
        }
        known
    }
}

static BUILTIN: OnceLock<KnownChecksums> = OnceLock::new();

/// Entries of the built-in list, in file order.
pub fn builtin_entries() -> Result<Vec<KnownEntry>> {
    serde_json::from_str(BUILTIN_JSON).context("parse built-in checksum list")
}

/// Checksums of officially published wrapper JARs, embedded at build time.
pub fn builtin() -> &'static KnownChecksums {
    BUILTIN.get_or_init(|| match KnownChecksums::from_json(BUILTIN_JSON) {
        Ok(known) => known,
        Err(err) => {
            tracing::error!("built-in checksum list is unreadable: {:#}", err);
            KnownChecksums::new()
        }
    })
}
