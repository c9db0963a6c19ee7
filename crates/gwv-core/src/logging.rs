//! Tracing setup. Events are appended to `~/.local/state/gwv/gwv.log`; the CLI
//! falls back to stderr when that file cannot be opened.
//!
//! `RUST_LOG` overrides the default filter.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,gwv=debug,gwv_core=debug";
const LOG_FILE_NAME: &str = "gwv.log";

/// Install the file logger and return the log file path.
pub fn init_logging() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gwv")?;
    let (path, file) = open_log_file(&xdg_dirs.get_state_home().join("gwv"))?;
    install(Mutex::new(file))?;
    tracing::info!("gwv {} logging to {}", env!("CARGO_PKG_VERSION"), path.display());
    Ok(path)
}

/// Install a stderr logger. Never fails; a subscriber that is already set wins.
pub fn init_logging_stderr() {
    let _ = install(io::stderr);
}

/// Create `dir` if needed and open `dir/gwv.log` for appending.
fn open_log_file(dir: &Path) -> Result<(PathBuf, File)> {
    fs::create_dir_all(dir).with_context(|| format!("create log dir: {}", dir.display()))?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file: {}", path.display()))?;
    Ok((path, file))
}

fn install<W>(writer: W) -> Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install log subscriber: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn open_log_file_creates_dir_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("state").join("gwv");

        let (path, mut file) = open_log_file(&log_dir).unwrap();
        assert_eq!(path, log_dir.join("gwv.log"));
        file.write_all(b"first\n").unwrap();

        let (_, mut again) = open_log_file(&log_dir).unwrap();
        again.write_all(b"second\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn open_log_file_fails_when_dir_is_a_file() {
        let f = tempfile::NamedTempFile::new().unwrap();
        assert!(open_log_file(f.path()).is_err());
    }
}
