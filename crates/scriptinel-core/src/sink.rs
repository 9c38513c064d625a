//! Result sink: a single consumer persisting `(asset_url, status)` rows.
//!
//! Producers (site workers on the blocking pool) push records into a bounded
//! channel; one consumer on the blocking pool appends each record as a CSV
//! row and flushes it, so partial progress survives an interrupted run. The
//! consumer stops when every `RecordSender` has been dropped and the queue is
//! drained; `ResultSink::finish` waits for that.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Ok,
    Mismatch,
}

impl RecordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Ok => "ok",
            RecordStatus::Mismatch => "mismatch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResultRecord {
    pub asset_url: String,
    pub status: RecordStatus,
}

impl ScanResultRecord {
    /// One CSV row, newline-terminated.
    pub fn to_csv_row(&self) -> String {
        format!("{},{}\n", csv_field(&self.asset_url), self.status.as_str())
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// What the consumer wrote before the channel closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkStats {
    pub written: u64,
    pub write_errors: u64,
}

/// Producer handle. Clone one per worker; drop all to let the sink finish.
#[derive(Debug, Clone)]
pub struct RecordSender {
    tx: mpsc::Sender<ScanResultRecord>,
}

impl RecordSender {
    /// Enqueue a record, blocking only while the queue is full.
    ///
    /// Must be called from a blocking context (not from inside an async task).
    /// Returns false if the consumer has already stopped.
    pub fn send(&self, record: ScanResultRecord) -> bool {
        self.tx.blocking_send(record).is_ok()
    }
}

pub struct ResultSink {
    handle: JoinHandle<SinkStats>,
}

impl ResultSink {
    /// Start the consumer over `writer`. Must be called within a tokio runtime.
    pub fn spawn<W>(writer: W, capacity: usize) -> (RecordSender, ResultSink)
    where
        W: Write + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::task::spawn_blocking(move || drain(rx, writer));
        (RecordSender { tx }, ResultSink { handle })
    }

    /// Open `path` for appending (created if missing) and start the consumer.
    /// Fails up front if the output is not writable.
    pub fn append_to(path: &Path, capacity: usize) -> Result<(RecordSender, ResultSink)> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create output dir {}", parent.display()))?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open output {}", path.display()))?;
        Ok(Self::spawn(file, capacity))
    }

    /// Wait for the consumer to drain and close. All senders must be dropped first.
    pub async fn finish(self) -> Result<SinkStats> {
        self.handle
            .await
            .map_err(|e| anyhow::anyhow!("result sink join: {}", e))
    }
}

fn drain<W: Write>(mut rx: mpsc::Receiver<ScanResultRecord>, mut writer: W) -> SinkStats {
    let mut stats = SinkStats::default();
    while let Some(record) = rx.blocking_recv() {
        let row = record.to_csv_row();
        match writer.write_all(row.as_bytes()).and_then(|_| writer.flush()) {
            Ok(()) => stats.written += 1,
            Err(e) => {
                stats.write_errors += 1;
                tracing::warn!(url = %record.asset_url, "result write failed: {}", e);
            }
        }
    }
    stats
}
