//! Payloads of the Gradle services API.

use serde::Deserialize;

use crate::checksum::is_sha256_hex;
use crate::checksums::KnownChecksums;

/// One element of `GET /versions/all`. Unlisted fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub version: String,
    #[serde(default)]
    pub snapshot: bool,
    #[serde(default, rename = "wrapperChecksumUrl")]
    pub wrapper_checksum_url: Option<String>,
}

pub fn parse_versions(body: &[u8]) -> Result<Vec<VersionEntry>, serde_json::Error> {
    serde_json::from_slice(body)
}

/// `(version, checksum URL)` pairs worth fetching: entries that publish a
/// wrapper checksum, are not snapshots (unless allowed), and whose version is
/// not already in `known`.
pub fn pending_checksum_urls<'a>(
    entries: &'a [VersionEntry],
    known: &KnownChecksums,
    allow_snapshots: bool,
) -> Vec<(&'a str, &'a str)> {
    entries
        .iter()
        .filter(|e| allow_snapshots || !e.snapshot)
        .filter(|e| !known.has_version(&e.version))
        .filter_map(|e| {
            e.wrapper_checksum_url
                .as_deref()
                .map(|url| (e.version.as_str(), url))
        })
        .collect()
}

/// Body of a `.sha256` endpoint: a single hex digest, possibly with trailing whitespace.
pub fn parse_checksum_body(body: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(body).ok()?.trim();
    is_sha256_hex(text).then(|| text.to_ascii_lowercase())
}
