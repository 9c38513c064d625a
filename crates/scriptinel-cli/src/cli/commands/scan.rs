//! `scriptinel scan` – scan a site list for one library.

use anyhow::{Context, Result};
use scriptinel_core::cache::FingerprintCache;
use scriptinel_core::compare::Comparator;
use scriptinel_core::config::{self, ScanConfig};
use scriptinel_core::fetch::{CurlFetcher, FetchOptions};
use scriptinel_core::library::Library;
use scriptinel_core::scan::{ScanSettings, ScanSummary, Scanner};
use scriptinel_core::sink::ResultSink;
use scriptinel_core::site;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ScanArgs {
    pub library: Library,
    pub sites: PathBuf,
    pub out: Option<PathBuf>,
    pub workers: Option<usize>,
    pub pacing_ms: Option<u64>,
    pub config: Option<PathBuf>,
    pub json: bool,
}

pub async fn run_scan(args: ScanArgs) -> Result<()> {
    let cfg = effective_config(&args)?;
    tracing::debug!("scan config: {:?}", cfg);

    let sites = site::read_sites(&args.sites)?;
    println!("Working with {} URLs", sites.len());

    let out = args
        .out
        .clone()
        .unwrap_or_else(|| default_output(args.library));
    let (records, sink) = ResultSink::append_to(&out, cfg.sink_capacity)?;
    tracing::info!(path = %out.display(), "appending results");

    let fetcher = CurlFetcher::new(FetchOptions::from_config(&cfg));
    let comparator = Comparator::new(fetcher, Arc::new(FingerprintCache::new()), &cfg);
    let scanner = Scanner::new(comparator, ScanSettings::from_config(&cfg));
    let summary = scanner.run(sites, args.library, records, sink).await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("serialize summary")?
        );
    } else {
        print_summary(&summary, &out);
    }
    Ok(())
}

/// Config file (explicit path or XDG default) with command-line overrides applied.
fn effective_config(args: &ScanArgs) -> Result<ScanConfig> {
    let mut cfg = match &args.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load_or_init()?,
    };
    if let Some(workers) = args.workers {
        anyhow::ensure!(workers > 0, "--workers must be at least 1");
        cfg.workers = workers;
    }
    if let Some(ms) = args.pacing_ms {
        cfg.pacing_ms = ms;
    }
    Ok(cfg)
}

fn default_output(library: Library) -> PathBuf {
    std::env::temp_dir().join(format!("{}.csv", library.name()))
}

fn print_summary(summary: &ScanSummary, out: &Path) {
    println!(
        "Scanned {} sites: {} ok, {} mismatch, {} skipped",
        summary.sites_done, summary.matched, summary.mismatched, summary.skipped
    );
    if summary.failed_sites > 0 {
        println!("Failed sites: {} (see log)", summary.failed_sites);
    }
    if summary.record_write_errors > 0 {
        println!("Result rows not written: {}", summary.record_write_errors);
    }
    println!("Results: {}", out.display());
    println!("Problematic hosts: {}", summary.problematic_hosts);
}
