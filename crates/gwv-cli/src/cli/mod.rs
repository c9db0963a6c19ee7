//! CLI for Gradle Wrapper JAR validation.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use gwv_core::config;
use std::path::PathBuf;

use commands::{run_checksum, run_completions, run_known_checksums, run_man, run_validate};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gwv", version)]
#[command(about = "Validate Gradle Wrapper JARs against known-good checksums", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Validate every Gradle Wrapper JAR under a directory.
    Validate(ValidateArgs),

    /// Compute SHA-256 of a file (e.g. a wrapper JAR).
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Print the built-in known checksums as JSON.
    KnownChecksums {
        /// Fetch the full list from the Gradle services API instead.
        #[arg(long)]
        refresh: bool,
        /// With --refresh, include snapshot versions.
        #[arg(long, requires = "refresh")]
        allow_snapshots: bool,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },

    /// Print the man page (roff).
    Man,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Directory to scan.
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Fail if fewer wrapper JARs are found (default from config).
    #[arg(long, value_name = "N")]
    pub min_wrapper_count: Option<usize>,

    /// Trust checksums of snapshot builds published by the API
    /// (`--allow-snapshots` or `--allow-snapshots=false`; default from config).
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub allow_snapshots: Option<bool>,

    /// Extra checksums to trust, comma separated.
    #[arg(long, value_delimiter = ',', value_name = "SHA256")]
    pub allow_checksums: Vec<String>,

    /// Directory for fetched and validated checksum lists (default: XDG state dir).
    #[arg(long, value_name = "DIR", conflicts_with = "no_cache")]
    pub cache_dir: Option<PathBuf>,

    /// Neither read nor write checksum caches.
    #[arg(long)]
    pub no_cache: bool,

    /// Override the Gradle versions listing endpoint.
    #[arg(long, value_name = "URL")]
    pub versions_url: Option<String>,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Validate(args) => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_validate(cfg, args).await?;
            }
            CliCommand::Checksum { path } => run_checksum(&path).await?,
            CliCommand::KnownChecksums {
                refresh,
                allow_snapshots,
            } => {
                let cfg = config::load_or_init()?;
                run_known_checksums(&cfg, refresh, allow_snapshots).await?;
            }
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
