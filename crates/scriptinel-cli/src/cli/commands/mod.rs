//! CLI command handlers, one per file.

mod fingerprint;
mod scan;
mod version;

pub use fingerprint::run_fingerprint;
pub use scan::{run_scan, ScanArgs};
pub use version::run_version;
