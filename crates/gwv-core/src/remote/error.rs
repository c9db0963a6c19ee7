//! Error type for fetching checksums from the Gradle services API.

use thiserror::Error;

/// Why a remote fetch failed. Any variant fails the whole fetch; nothing is retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (DNS, connect, timeout, TLS, ...).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },
    /// Response had a non-2xx status.
    #[error("GET {url} returned HTTP {code}")]
    Http { url: String, code: u32 },
    /// Version listing was not the expected JSON.
    #[error("unexpected response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    /// Checksum endpoint returned something other than a SHA-256 hex digest.
    #[error("malformed checksum from {url}: {body:?}")]
    MalformedChecksum { url: String, body: String },
    /// Listing referenced a checksum URL that is not http(s).
    #[error("invalid checksum URL {url:?}")]
    InvalidUrl { url: String },
}

impl FetchError {
    pub(crate) fn transport(url: &str, source: curl::Error) -> Self {
        FetchError::Transport {
            url: url.to_string(),
            source,
        }
    }
}
