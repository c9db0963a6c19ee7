//! Remote source of known-good wrapper checksums.
//!
//! [`ChecksumProvider`] is the seam the validation engine consumes.
//! [`GradleServicesProvider`] implements it against `services.gradle.org`:
//! it lists all versions, then downloads the published `.sha256` for every
//! version not already known.

mod error;
mod http;
pub mod parse;

pub use error::FetchError;

use std::time::Duration;

use crate::checksums::{KnownChecksums, KnownEntry};
use crate::config::GwvConfig;
use http::HttpClient;
use parse::VersionEntry;

/// Default version listing endpoint.
pub const DEFAULT_VERSIONS_URL: &str = "https://services.gradle.org/versions/all";

/// Something that can produce the current set of known-good wrapper checksums.
pub trait ChecksumProvider {
    /// Fetch checksums, tagged with their versions, for versions not already
    /// covered by `known`. Snapshot versions are included only when
    /// `allow_snapshots` is set.
    fn fetch(
        &self,
        known: &KnownChecksums,
        allow_snapshots: bool,
    ) -> Result<KnownChecksums, FetchError>;
}

/// Provider backed by the Gradle services HTTP API.
#[derive(Debug, Clone)]
pub struct GradleServicesProvider {
    versions_url: String,
    client: HttpClient,
}

impl Default for GradleServicesProvider {
    fn default() -> Self {
        Self::new(DEFAULT_VERSIONS_URL)
    }
}

impl GradleServicesProvider {
    pub fn new(versions_url: impl Into<String>) -> Self {
        Self {
            versions_url: versions_url.into(),
            client: HttpClient::default(),
        }
    }

    /// Provider using the endpoint and timeouts from `cfg`.
    pub fn from_config(cfg: &GwvConfig) -> Self {
        Self::new(cfg.versions_url.clone()).with_timeouts(
            Duration::from_secs(cfg.connect_timeout_secs),
            Duration::from_secs(cfg.timeout_secs),
        )
    }

    pub fn with_timeouts(mut self, connect: Duration, total: Duration) -> Self {
        self.client.connect_timeout = connect;
        self.client.timeout = total;
        self
    }

    pub fn versions_url(&self) -> &str {
        &self.versions_url
    }

    fn versions(&self) -> Result<Vec<VersionEntry>, FetchError> {
        let body = self.client.get(&self.versions_url)?;
        parse::parse_versions(&body).map_err(|source| FetchError::Parse {
            url: self.versions_url.clone(),
            source,
        })
    }

    fn checksum_at(&self, url: &str) -> Result<String, FetchError> {
        let is_http = url::Url::parse(url)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !is_http {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
            });
        }
        let body = self.client.get(url)?;
        parse::parse_checksum_body(&body).ok_or_else(|| FetchError::MalformedChecksum {
            url: url.to_string(),
            body: String::from_utf8_lossy(&body).chars().take(80).collect(),
        })
    }

    /// Every published version with its wrapper checksum, in listing order.
    pub fn fetch_all_versions(&self, allow_snapshots: bool) -> Result<Vec<KnownEntry>, FetchError> {
        let entries = self.versions()?;
        parse::pending_checksum_urls(&entries, &KnownChecksums::new(), allow_snapshots)
            .into_iter()
            .map(|(version, url)| -> Result<KnownEntry, FetchError> {
                Ok(KnownEntry {
                    version: Some(version.to_string()),
                    checksum: self.checksum_at(url)?,
                })
            })
            .collect()
    }
}

impl ChecksumProvider for GradleServicesProvider {
    fn fetch(
        &self,
        known: &KnownChecksums,
        allow_snapshots: bool,
    ) -> Result<KnownChecksums, FetchError> {
        let entries = self.versions()?;
        let pending = parse::pending_checksum_urls(&entries, known, allow_snapshots);
        tracing::info!(
            "fetching {} wrapper checksums listed at {}",
            pending.len(),
            self.versions_url
        );

        let mut fetched = KnownChecksums::new();
        for (version, url) in pending {
            let checksum = self.checksum_at(url)?;
            tracing::debug!("gradle {} wrapper checksum {}", version, checksum);
            fetched.add(Some(version), &checksum);
        }
        Ok(fetched)
    }
}
