//! `scriptinel fingerprint` – digest a local script the way the scanner does.

use anyhow::Result;
use scriptinel_core::config;
use scriptinel_core::fingerprint;
use scriptinel_core::normalize::Normalizer;
use std::path::Path;

/// Print the normalized SHA-256 and length of the given file.
pub fn run_fingerprint(path: &Path) -> Result<()> {
    let cfg = config::load_or_init()?;
    let normalizer = Normalizer::with_extra_artifacts(&cfg.extra_benign_artifacts);
    let fp = fingerprint::fingerprint_path(&normalizer, path)?;
    println!("{}  {}  {}", fp.digest, fp.len, path.display());
    Ok(())
}
