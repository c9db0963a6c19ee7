use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::remote::DEFAULT_VERSIONS_URL;

/// Global configuration loaded from `~/.config/gwv/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GwvConfig {
    /// Gradle services endpoint listing every version and its checksum URL.
    pub versions_url: String,
    /// Connect timeout for API requests, in seconds.
    pub connect_timeout_secs: u64,
    /// Total timeout per API request, in seconds.
    pub timeout_secs: u64,
    /// Minimum number of wrapper JARs a validated tree must contain.
    pub min_wrapper_count: usize,
    /// Trust snapshot builds published by the API.
    #[serde(default)]
    pub allow_snapshots: bool,
    /// Extra checksums to trust without consulting the API.
    #[serde(default)]
    pub allowed_checksums: Vec<String>,
    /// Where fetched and validated checksum lists are kept (None = XDG state dir).
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for GwvConfig {
    fn default() -> Self {
        Self {
            versions_url: DEFAULT_VERSIONS_URL.to_string(),
            connect_timeout_secs: 15,
            timeout_secs: 30,
            min_wrapper_count: 1,
            allow_snapshots: false,
            allowed_checksums: Vec::new(),
            cache_dir: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gwv")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GwvConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<GwvConfig> {
    if !path.exists() {
        let default_cfg = GwvConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: GwvConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = GwvConfig::default();
        assert_eq!(cfg.versions_url, "https://services.gradle.org/versions/all");
        assert_eq!(cfg.connect_timeout_secs, 15);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.min_wrapper_count, 1);
        assert!(!cfg.allow_snapshots);
        assert!(cfg.allowed_checksums.is_empty());
        assert!(cfg.cache_dir.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = GwvConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: GwvConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.versions_url, cfg.versions_url);
        assert_eq!(parsed.min_wrapper_count, cfg.min_wrapper_count);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            versions_url = "http://127.0.0.1:8080/versions/all"
            connect_timeout_secs = 2
            timeout_secs = 5
            min_wrapper_count = 0
            allow_snapshots = true
            allowed_checksums = ["e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"]
            cache_dir = "/var/cache/gwv"
        "#;
        let cfg: GwvConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.versions_url, "http://127.0.0.1:8080/versions/all");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.min_wrapper_count, 0);
        assert!(cfg.allow_snapshots);
        assert_eq!(cfg.allowed_checksums.len(), 1);
        assert_eq!(cfg.cache_dir.as_deref(), Some(Path::new("/var/cache/gwv")));
    }

    #[test]
    fn optional_sections_default_when_missing() {
        let toml = r#"
            versions_url = "https://services.gradle.org/versions/all"
            connect_timeout_secs = 15
            timeout_secs = 30
            min_wrapper_count = 1
        "#;
        let cfg: GwvConfig = toml::from_str(toml).unwrap();
        assert!(!cfg.allow_snapshots);
        assert!(cfg.allowed_checksums.is_empty());
        assert!(cfg.cache_dir.is_none());
    }

    #[test]
    fn load_or_init_creates_then_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gwv").join("config.toml");
        let created = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        let loaded = load_or_init_at(&path).unwrap();
        assert_eq!(created.versions_url, loaded.versions_url);
        assert_eq!(created.min_wrapper_count, loaded.min_wrapper_count);
    }
}
