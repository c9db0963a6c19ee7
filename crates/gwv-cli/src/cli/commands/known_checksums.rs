//! Known-checksums command: dump the built-in list, or regenerate it from the API.

use anyhow::{Context, Result};
use gwv_core::checksums;
use gwv_core::config::GwvConfig;
use gwv_core::remote::GradleServicesProvider;

pub async fn run_known_checksums(cfg: &GwvConfig, refresh: bool, allow_snapshots: bool) -> Result<()> {
    let entries = if refresh {
        let provider = GradleServicesProvider::from_config(cfg);
        tracing::info!("refreshing known checksums from {}", provider.versions_url());
        tokio::task::spawn_blocking(move || provider.fetch_all_versions(allow_snapshots))
            .await
            .context("checksum refresh task panicked")??
    } else {
        checksums::builtin_entries()?
    };
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
