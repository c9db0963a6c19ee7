//! Tests for checksum, known-checksums, completions, man.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn cli_parse_checksum() {
    match parse(&["gwv", "checksum", "gradle/wrapper/gradle-wrapper.jar"]) {
        CliCommand::Checksum { path } => {
            assert_eq!(path, PathBuf::from("gradle/wrapper/gradle-wrapper.jar"))
        }
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_parse_known_checksums() {
    match parse(&["gwv", "known-checksums"]) {
        CliCommand::KnownChecksums {
            refresh,
            allow_snapshots,
        } => {
            assert!(!refresh);
            assert!(!allow_snapshots);
        }
        _ => panic!("expected KnownChecksums"),
    }
    match parse(&["gwv", "known-checksums", "--refresh", "--allow-snapshots"]) {
        CliCommand::KnownChecksums {
            refresh,
            allow_snapshots,
        } => {
            assert!(refresh);
            assert!(allow_snapshots);
        }
        _ => panic!("expected KnownChecksums"),
    }
}

#[test]
fn cli_snapshots_require_refresh() {
    let res = Cli::try_parse_from(["gwv", "known-checksums", "--allow-snapshots"]);
    assert!(res.is_err());
}

#[test]
fn cli_parse_completions() {
    match parse(&["gwv", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, clap_complete::Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_parse_man() {
    assert!(matches!(parse(&["gwv", "man"]), CliCommand::Man));
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
