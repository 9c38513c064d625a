//! Scan orchestration over the whole site list.
//!
//! Keeps up to `workers` sites in flight at once on tokio's blocking pool;
//! when one finishes, the next site is started until the list is exhausted.
//! Nothing a single site does (network failure, unexpected error, panic)
//! escapes its unit of work: it becomes a counter increment and a log line.
//! The run ends once every site is done and the result sink has drained.

mod site;
mod stats;

pub use stats::ScanSummary;

use stats::ScanStats;

use anyhow::Result;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use crate::compare::Comparator;
use crate::config::ScanConfig;
use crate::fetch::Fetch;
use crate::library::Library;
use crate::site::Site;
use crate::sink::{RecordSender, ResultSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSettings {
    /// Maximum sites in flight.
    pub workers: usize,
    /// Delay after each asset comparison on a site.
    pub pacing: Duration,
}

impl ScanSettings {
    pub fn from_config(cfg: &ScanConfig) -> Self {
        Self {
            workers: cfg.workers.max(1),
            pacing: cfg.pacing(),
        }
    }
}

/// Why a site's unit of work did not complete normally.
enum SiteFailure {
    Error(String),
    Panic(String),
}

pub struct Scanner<F> {
    comparator: Arc<Comparator<F>>,
    settings: ScanSettings,
    stats: ScanStats,
}

impl<F: Fetch + 'static> Scanner<F> {
    pub fn new(comparator: Comparator<F>, settings: ScanSettings) -> Self {
        Self {
            comparator: Arc::new(comparator),
            settings,
            stats: ScanStats::new(),
        }
    }

    pub fn comparator(&self) -> &Comparator<F> {
        &self.comparator
    }

    /// Scan every site for `library`, then close `records` and wait for `sink`.
    ///
    /// Errors only if the sink consumer itself died; per-site failures are counted.
    pub async fn run(
        &self,
        sites: Vec<Site>,
        library: Library,
        records: RecordSender,
        sink: ResultSink,
    ) -> Result<ScanSummary> {
        let total = sites.len();
        let max_concurrent = self.settings.workers.max(1);
        tracing::info!(sites = total, workers = max_concurrent, %library, "scan started");

        let mut pending = sites.into_iter();
        let mut join_set = tokio::task::JoinSet::new();

        loop {
            while join_set.len() < max_concurrent {
                let Some(site) = pending.next() else {
                    break;
                };
                let comparator = Arc::clone(&self.comparator);
                let records = records.clone();
                let pacing = self.settings.pacing;
                join_set.spawn_blocking(move || {
                    let result = panic::catch_unwind(AssertUnwindSafe(|| {
                        site::scan_site(&comparator, &site, library, pacing, &records)
                    }));
                    let outcome = match result {
                        Ok(Ok(report)) => Ok(report),
                        Ok(Err(e)) => Err(SiteFailure::Error(e.to_string())),
                        Err(payload) => Err(SiteFailure::Panic(panic_message(payload.as_ref()))),
                    };
                    (site, outcome)
                });
            }

            let Some(res) = join_set.join_next().await else {
                break;
            };
            match res {
                Ok((_, Ok(report))) => self.stats.record_site(&report),
                Ok((site, Err(SiteFailure::Error(e)))) => {
                    tracing::warn!(site = %site, "site scan failed: {}", e);
                    self.stats.record_failure();
                }
                Ok((site, Err(SiteFailure::Panic(msg)))) => {
                    tracing::error!(site = %site, "site scan panicked: {}", msg);
                    self.stats.record_failure();
                }
                Err(e) => {
                    tracing::error!("site task join: {}", e);
                    self.stats.record_failure();
                }
            }
            let done = self.stats.sites_done();
            if done % 100 == 0 {
                tracing::info!(done, total, "scan progress");
            }
        }

        drop(records);
        let sink_stats = sink.finish().await?;
        let summary = self
            .stats
            .summary(total, sink_stats, self.comparator.cache().computations());
        tracing::info!(
            sites = summary.sites,
            matched = summary.matched,
            mismatched = summary.mismatched,
            skipped = summary.skipped,
            problematic_hosts = summary.problematic_hosts,
            failed_sites = summary.failed_sites,
            "scan finished"
        );
        Ok(summary)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
