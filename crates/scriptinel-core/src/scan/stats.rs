//! Run-wide counters shared by all site workers.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::compare::Outcome;
use crate::sink::SinkStats;

/// What one site's unit of work observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiteReport {
    pub matched: usize,
    pub mismatched: usize,
    pub skipped: usize,
    /// The host could not be reached (missing assets do not count).
    pub unreachable: bool,
}

impl SiteReport {
    pub fn tally(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Match(_) => self.matched += 1,
            Outcome::Mismatch => self.mismatched += 1,
            Outcome::Skip(reason) => {
                self.skipped += 1;
                if reason.is_unreachable() {
                    self.unreachable = true;
                }
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanStats {
    sites_done: AtomicUsize,
    problematic_hosts: AtomicUsize,
    failed_sites: AtomicUsize,
    matched: AtomicUsize,
    mismatched: AtomicUsize,
    skipped: AtomicUsize,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_site(&self, report: &SiteReport) {
        self.sites_done.fetch_add(1, Ordering::Relaxed);
        self.matched.fetch_add(report.matched, Ordering::Relaxed);
        self.mismatched.fetch_add(report.mismatched, Ordering::Relaxed);
        self.skipped.fetch_add(report.skipped, Ordering::Relaxed);
        if report.unreachable {
            self.problematic_hosts.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// A unit of work ended in an unexpected error or panic.
    pub fn record_failure(&self) {
        self.sites_done.fetch_add(1, Ordering::Relaxed);
        self.failed_sites.fetch_add(1, Ordering::Relaxed);
    }

    pub fn sites_done(&self) -> usize {
        self.sites_done.load(Ordering::Relaxed)
    }

    pub fn problematic_hosts(&self) -> usize {
        self.problematic_hosts.load(Ordering::Relaxed)
    }

    pub fn failed_sites(&self) -> usize {
        self.failed_sites.load(Ordering::Relaxed)
    }

    pub fn summary(&self, sites: usize, sink: SinkStats, canonical_fetches: usize) -> ScanSummary {
        ScanSummary {
            sites,
            sites_done: self.sites_done(),
            problematic_hosts: self.problematic_hosts(),
            failed_sites: self.failed_sites(),
            matched: self.matched.load(Ordering::Relaxed),
            mismatched: self.mismatched.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            records_written: sink.written,
            record_write_errors: sink.write_errors,
            canonical_fetches,
        }
    }
}

/// End-of-run totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub sites: usize,
    pub sites_done: usize,
    pub problematic_hosts: usize,
    pub failed_sites: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub skipped: usize,
    pub records_written: u64,
    pub record_write_errors: u64,
    pub canonical_fetches: usize,
}
