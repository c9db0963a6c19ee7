//! Validate command: scan a tree, report, and fail the process on unknown wrappers.
//!
//! Two checksum lists live in the cache dir: checksums fetched from the API
//! (consulted by the engine before going remote) and checksums of wrappers
//! that passed validation (fed back in as previously valid).

use anyhow::{Context, Result};
use gwv_core::cache::{ChecksumCache, VALIDATED_FILE_NAME};
use gwv_core::config::GwvConfig;
use gwv_core::remote::GradleServicesProvider;
use gwv_core::{ValidationOptions, ValidationResult, Validator};
use std::path::PathBuf;

use crate::cli::ValidateArgs;

pub async fn run_validate(cfg: GwvConfig, args: ValidateArgs) -> Result<()> {
    let result = tokio::task::spawn_blocking(move || validate_blocking(&cfg, &args))
        .await
        .context("validation task panicked")??;

    let report = result.to_display_string();
    if !report.is_empty() {
        println!("{}", report);
    }

    if result.is_valid() {
        return Ok(());
    }
    if !result.invalid.is_empty() {
        println!("failed-wrapper={}", result.failed_wrapper_paths());
    }
    anyhow::bail!(
        "Gradle Wrapper Validation Failed! ({} unknown wrapper JARs, {} other errors)",
        result.invalid.len(),
        result.errors.len()
    )
}

fn validate_blocking(cfg: &GwvConfig, args: &ValidateArgs) -> Result<ValidationResult> {
    let provider = match &args.versions_url {
        Some(url) => GradleServicesProvider::from_config(&GwvConfig {
            versions_url: url.clone(),
            ..cfg.clone()
        }),
        None => GradleServicesProvider::from_config(cfg),
    };

    let cache_dir = resolve_cache_dir(cfg, args)?;
    let fetched_cache = cache_dir.as_ref().map(|d| ChecksumCache::new(d));
    let validated_cache = cache_dir
        .as_ref()
        .map(|d| ChecksumCache::with_file_name(d, VALIDATED_FILE_NAME));

    let previously_valid = match &validated_cache {
        Some(cache) => cache.load().unwrap_or_else(|err| {
            tracing::warn!("ignoring unreadable validated-checksum list: {:#}", err);
            Default::default()
        }),
        None => Default::default(),
    };

    let opts = build_options(cfg, args, previously_valid.to_vec());

    let mut validator = Validator::new(&provider);
    if let Some(cache) = &fetched_cache {
        validator = validator.with_cache(cache);
    }
    let result = validator.find_invalid_wrapper_jars(&args.root, &opts)?;

    if result.is_valid() {
        if let Some(cache) = &validated_cache {
            let mut keep = previously_valid.to_vec();
            keep.extend(result.valid.iter().map(|j| j.checksum.clone()));
            if let Err(err) = cache.save(&keep) {
                tracing::warn!("could not record validated checksums: {:#}", err);
            }
        }
    }

    Ok(result)
}

/// `--no-cache` wins, then `--cache-dir`, then config, then the XDG default.
fn resolve_cache_dir(cfg: &GwvConfig, args: &ValidateArgs) -> Result<Option<PathBuf>> {
    if args.no_cache {
        return Ok(None);
    }
    if let Some(dir) = args.cache_dir.clone().or_else(|| cfg.cache_dir.clone()) {
        return Ok(Some(dir));
    }
    Ok(Some(ChecksumCache::default_dir()?))
}

/// Merge config and flags: flags override scalars, allow-lists are combined.
fn build_options(
    cfg: &GwvConfig,
    args: &ValidateArgs,
    previously_valid_checksums: Vec<String>,
) -> ValidationOptions {
    let mut allowed_checksums = cfg.allowed_checksums.clone();
    allowed_checksums.extend(args.allow_checksums.iter().cloned());
    ValidationOptions {
        min_wrapper_count: args.min_wrapper_count.unwrap_or(cfg.min_wrapper_count),
        allow_snapshots: args.allow_snapshots.unwrap_or(cfg.allow_snapshots),
        allowed_checksums,
        previously_valid_checksums,
        known_checksums: None,
    }
}
