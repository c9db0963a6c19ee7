//! Blocking HTTP GET via the curl crate (libcurl).

use std::time::Duration;

use super::error::FetchError;

const USER_AGENT: &str = concat!("gwv/", env!("CARGO_PKG_VERSION"));

/// Minimal GET client with fixed timeouts.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HttpClient {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(30),
        }
    }
}

impl HttpClient {
    /// GET `url` and return the body. Follows redirects; any non-2xx status is an error.
    /// Runs in the current thread; call from `spawn_blocking` if used from async code.
    pub fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut body: Vec<u8> = Vec::new();

        let err = |e| FetchError::transport(url, e);

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(err)?;
        easy.follow_location(true).map_err(err)?;
        easy.useragent(USER_AGENT).map_err(err)?;
        easy.connect_timeout(self.connect_timeout).map_err(err)?;
        easy.timeout(self.timeout).map_err(err)?;

        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(err)?;
            transfer.perform().map_err(err)?;
        }

        let code = easy.response_code().map_err(err)?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http {
                url: url.to_string(),
                code,
            });
        }

        tracing::debug!("GET {} -> {} ({} bytes)", url, code, body.len());
        Ok(body)
    }
}
