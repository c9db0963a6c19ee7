//! Project tree scanning for wrapper JAR candidates.
//!
//! Walks the tree with `walkdir`, keeps regular files whose name folds to
//! `gradle-wrapper.jar` (see [`homoglyph`]), and hashes each one. Results are
//! sorted by relative path so reports are reproducible.

pub mod homoglyph;

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Component, Path};
use walkdir::WalkDir;

use crate::checksum;

/// Canonical file name of the Gradle Wrapper JAR.
pub const WRAPPER_JAR_FILENAME: &str = "gradle-wrapper.jar";

/// A wrapper JAR candidate: path relative to the scanned root plus its SHA-256.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WrapperJar {
    /// `/`-separated path relative to the scan root.
    pub path: String,
    /// Lowercase hex SHA-256 of the file content.
    pub checksum: String,
}

impl WrapperJar {
    pub fn new(path: impl Into<String>, checksum: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            checksum: checksum.into(),
        }
    }
}

impl fmt::Display for WrapperJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.checksum, self.path)
    }
}

/// True if `file_name` is, or imitates, the wrapper JAR name.
pub fn is_wrapper_jar_name(file_name: &str) -> bool {
    homoglyph::is_confusable(file_name, WRAPPER_JAR_FILENAME)
}

/// Relative paths (`/`-separated, sorted) of every wrapper JAR candidate under `root`.
///
/// Fails if `root` is missing or not a directory, or if any part of the tree
/// cannot be read.
pub fn find_wrapper_jars(root: &Path) -> Result<Vec<String>> {
    let meta =
        std::fs::metadata(root).with_context(|| format!("scan root {}", root.display()))?;
    if !meta.is_dir() {
        anyhow::bail!("scan root {} is not a directory", root.display());
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !is_wrapper_jar_name(name) {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("relativize {}", entry.path().display()))?;
        found.push(to_slash_path(rel));
    }

    found.sort();
    tracing::debug!(
        "found {} wrapper JAR candidates under {}",
        found.len(),
        root.display()
    );
    Ok(found)
}

/// Find and hash every wrapper JAR candidate under `root`, in path order.
pub fn scan_wrapper_jars(root: &Path) -> Result<Vec<WrapperJar>> {
    find_wrapper_jars(root)?
        .into_iter()
        .map(|rel| -> Result<WrapperJar> {
            let digest = checksum::sha256_path(&root.join(&rel))?;
            Ok(WrapperJar::new(rel, digest))
        })
        .collect()
}

fn to_slash_path(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
