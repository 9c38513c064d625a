//! CLI for the scriptinel library integrity scanner.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use scriptinel_core::library::Library;
use std::path::PathBuf;

use commands::{run_fingerprint, run_scan, run_version, ScanArgs};

/// Top-level CLI for the scriptinel scanner.
#[derive(Debug, Parser)]
#[command(name = "scriptinel")]
#[command(about = "Scriptinel: checks that sites serve unmodified jQuery and WooCommerce scripts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Scan every site in a CSV list for one library.
    Scan {
        /// Library to check: jquery or woocommerce.
        library: Library,

        /// Site list; header row skipped, first column is the site base URL.
        sites: PathBuf,

        /// Results CSV, appended (default: <tmp>/<library>.csv).
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Sites scanned concurrently (overrides config).
        #[arg(long, value_name = "N")]
        workers: Option<usize>,

        /// Delay after each asset on a site, in milliseconds (overrides config).
        #[arg(long, value_name = "MS")]
        pacing_ms: Option<u64>,

        /// Config file to use instead of the XDG default.
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Print the end-of-run summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the normalized fingerprint (SHA-256 and length) of a local script.
    Fingerprint {
        /// Path to the script.
        path: PathBuf,
    },

    /// Print the library version declared by a local script or saved home page.
    Version {
        /// Path to the script or HTML page.
        path: PathBuf,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Scan {
                library,
                sites,
                out,
                workers,
                pacing_ms,
                config,
                json,
            } => {
                run_scan(ScanArgs {
                    library,
                    sites,
                    out,
                    workers,
                    pacing_ms,
                    config,
                    json,
                })
                .await?
            }
            CliCommand::Fingerprint { path } => run_fingerprint(&path)?,
            CliCommand::Version { path } => run_version(&path)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
