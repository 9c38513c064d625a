//! Tests for the scan subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use scriptinel_core::library::Library;
use std::path::PathBuf;

#[test]
fn cli_parse_scan_defaults() {
    match parse(&["scriptinel", "scan", "jquery", "sites.csv"]) {
        CliCommand::Scan {
            library,
            sites,
            out,
            workers,
            pacing_ms,
            config,
            json,
        } => {
            assert_eq!(library, Library::Jquery);
            assert_eq!(sites, PathBuf::from("sites.csv"));
            assert!(out.is_none());
            assert!(workers.is_none());
            assert!(pacing_ms.is_none());
            assert!(config.is_none());
            assert!(!json);
        }
        _ => panic!("expected Scan"),
    }
}

#[test]
fn cli_parse_scan_all_options() {
    match parse(&[
        "scriptinel",
        "scan",
        "WooCommerce",
        "top.csv",
        "--out",
        "/tmp/results.csv",
        "--workers",
        "32",
        "--pacing-ms",
        "0",
        "--config",
        "alt.toml",
        "--json",
    ]) {
        CliCommand::Scan {
            library,
            out,
            workers,
            pacing_ms,
            config,
            json,
            ..
        } => {
            assert_eq!(library, Library::Woocommerce);
            assert_eq!(out, Some(PathBuf::from("/tmp/results.csv")));
            assert_eq!(workers, Some(32));
            assert_eq!(pacing_ms, Some(0));
            assert_eq!(config, Some(PathBuf::from("alt.toml")));
            assert!(json);
        }
        _ => panic!("expected Scan"),
    }
}

#[test]
fn cli_parse_scan_rejects_unknown_library() {
    assert!(Cli::try_parse_from(["scriptinel", "scan", "react", "sites.csv"]).is_err());
}

#[test]
fn cli_parse_scan_requires_site_list() {
    assert!(Cli::try_parse_from(["scriptinel", "scan", "jquery"]).is_err());
}
