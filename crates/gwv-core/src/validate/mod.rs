//! Validation engine.
//!
//! Scans a tree for wrapper JARs and classifies each against the trust set:
//! known checksums (built-in unless overridden) ∪ allowed ∪ previously valid,
//! extended on demand by the checksum cache and then the remote provider.
//! Remote resolution only happens when local sources leave a candidate
//! unexplained.

mod result;

pub use result::ValidationResult;

use anyhow::Result;
use std::path::Path;

use crate::cache::ChecksumCache;
use crate::checksums::{self, ChecksumSet, KnownChecksums};
use crate::remote::ChecksumProvider;
use crate::scan::{self, WrapperJar};

/// Inputs of a validation run besides the root directory.
#[derive(Debug, Clone, Default)]
pub struct ValidationOptions {
    /// Fewer candidates than this adds an error to the result. Default 0.
    pub min_wrapper_count: usize,
    /// Let the remote provider include snapshot versions. Default false.
    pub allow_snapshots: bool,
    /// Checksums trusted explicitly by the caller. Default empty.
    pub allowed_checksums: Vec<String>,
    /// Checksums that passed validation in an earlier run. Default empty.
    pub previously_valid_checksums: Vec<String>,
    /// Replaces the built-in known checksums when set. Default None.
    pub known_checksums: Option<KnownChecksums>,
}

/// Trust sources consulted after the local ones fell short.
struct RemoteResolution {
    checksums: ChecksumSet,
    fetched: bool,
    error: Option<String>,
}

/// Runs validations against a checksum provider and an optional cache.
pub struct Validator<'a> {
    provider: &'a dyn ChecksumProvider,
    cache: Option<&'a ChecksumCache>,
}

impl<'a> Validator<'a> {
    pub fn new(provider: &'a dyn ChecksumProvider) -> Self {
        Self {
            provider,
            cache: None,
        }
    }

    /// Consult `cache` before the provider and store fetched checksums in it.
    pub fn with_cache(mut self, cache: &'a ChecksumCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Scan `root` and classify every wrapper JAR found.
    ///
    /// Only a scan failure (missing or unreadable tree) is returned as `Err`;
    /// fetch failures and count shortfalls are recorded in the result.
    pub fn find_invalid_wrapper_jars(
        &self,
        root: &Path,
        opts: &ValidationOptions,
    ) -> Result<ValidationResult> {
        let jars = scan::scan_wrapper_jars(root)?;

        let known = match &opts.known_checksums {
            Some(k) => k,
            None => checksums::builtin(),
        };
        let mut trusted = known.checksums().clone();
        trusted.extend(&opts.allowed_checksums);
        trusted.extend(&opts.previously_valid_checksums);

        let mut result = ValidationResult::default();

        if covers(&trusted, &jars) {
            tracing::debug!("local checksums cover all {} candidates", jars.len());
        } else {
            let remote = self.resolve_remote(&jars, &trusted, known, opts.allow_snapshots);
            trusted.union_with(&remote.checksums);
            result.fetched_checksums = remote.fetched;
            result.errors.extend(remote.error);
        }

        let total = jars.len();
        for jar in jars {
            if trusted.contains(&jar.checksum) {
                result.valid.push(jar);
            } else {
                tracing::warn!("unknown wrapper JAR {} ({})", jar.path, jar.checksum);
                result.invalid.push(jar);
            }
        }

        if total < opts.min_wrapper_count {
            result.errors.push(format!(
                "Expected to find at least {} Gradle Wrapper JARs but got only {}",
                opts.min_wrapper_count, total
            ));
        }

        tracing::info!(
            "validated {} wrapper JARs under {}: {} valid, {} invalid, {} errors",
            total,
            root.display(),
            result.valid.len(),
            result.invalid.len(),
            result.errors.len()
        );
        Ok(result)
    }

    /// Cache first; provider only if the cache does not explain every candidate.
    /// Versions already in the cache are not fetched again.
    fn resolve_remote(
        &self,
        jars: &[WrapperJar],
        trusted: &ChecksumSet,
        known: &KnownChecksums,
        allow_snapshots: bool,
    ) -> RemoteResolution {
        let cached = self.load_cache();
        if !cached.checksums().is_empty() {
            let mut combined = trusted.clone();
            combined.union_with(cached.checksums());
            if covers(&combined, jars) {
                tracing::debug!("checksum cache covers all candidates; not fetching");
                return RemoteResolution {
                    checksums: cached.checksums().clone(),
                    fetched: false,
                    error: None,
                };
            }
        }

        let mut skip = known.clone();
        skip.merge(&cached);
        match self.provider.fetch(&skip, allow_snapshots) {
            Ok(fetched) => {
                tracing::info!(
                    "fetched {} known wrapper checksums",
                    fetched.checksums().len()
                );
                let mut all = cached;
                all.merge(&fetched);
                self.store_cache(&all);
                RemoteResolution {
                    checksums: all.checksums().clone(),
                    fetched: true,
                    error: None,
                }
            }
            Err(err) => {
                tracing::warn!("fetching known wrapper checksums failed: {}", err);
                RemoteResolution {
                    checksums: cached.checksums().clone(),
                    fetched: true,
                    error: Some(format!(
                        "Failed to fetch known Gradle Wrapper checksums: {}",
                        err
                    )),
                }
            }
        }
    }

    fn load_cache(&self) -> KnownChecksums {
        let Some(cache) = self.cache else {
            return KnownChecksums::new();
        };
        match cache.load_known() {
            Ok(known) => {
                tracing::debug!(
                    "loaded {} cached checksums ({} versions) from {}",
                    known.checksums().len(),
                    known.version_count(),
                    cache.path().display()
                );
                known
            }
            Err(err) => {
                tracing::warn!("ignoring unreadable checksum cache: {:#}", err);
                KnownChecksums::new()
            }
        }
    }

    fn store_cache(&self, known: &KnownChecksums) {
        if let Some(cache) = self.cache {
            if let Err(err) = cache.save_known(known) {
                tracing::warn!("could not update checksum cache: {:#}", err);
            }
        }
    }
}

/// Validate `root` with `provider` and no cache.
pub fn find_invalid_wrapper_jars(
    root: &Path,
    opts: &ValidationOptions,
    provider: &dyn ChecksumProvider,
) -> Result<ValidationResult> {
    Validator::new(provider).find_invalid_wrapper_jars(root, opts)
}

fn covers(trusted: &ChecksumSet, jars: &[WrapperJar]) -> bool {
    trusted.contains_all(jars.iter().map(|j| j.checksum.as_str()))
}
