//! Canonical fingerprint cache shared by all concurrent comparisons of a scan.
//!
//! Keyed by `(VersionKey, AssetSpec)`. Entries are inserted whole under the
//! write lock, so readers see either no entry or a complete one. The lock is
//! not held while computing: two workers missing the same key may both fetch
//! the canonical reference, and the first insert wins. Failed or blank
//! computations are never stored, so a later call retries.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use thiserror::Error;

use crate::fetch::FetchError;
use crate::fingerprint::Fingerprint;
use crate::library::{AssetSpec, VersionKey};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub version: VersionKey,
    pub asset: AssetSpec,
}

impl CacheKey {
    pub fn new(version: &VersionKey, asset: &AssetSpec) -> Self {
        Self {
            version: version.clone(),
            asset: asset.clone(),
        }
    }
}

/// Why a canonical fingerprint could not be produced.
#[derive(Debug, Error)]
pub enum CanonicalError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("canonical reference {url} is blank")]
    Blank { url: String },
}

#[derive(Debug, Default)]
pub struct FingerprintCache {
    entries: RwLock<HashMap<CacheKey, Fingerprint>>,
    computations: AtomicUsize,
}

impl FingerprintCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Fingerprint> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of times `compute` was invoked (hits excluded).
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::Relaxed)
    }

    /// Cached fingerprint for `key`, computing and storing it on a miss.
    ///
    /// Returns `None` ("unknown") when `compute` fails or yields an empty
    /// fingerprint; nothing is stored in that case.
    pub fn get_or_compute<F>(&self, key: &CacheKey, compute: F) -> Option<Fingerprint>
    where
        F: FnOnce() -> Result<Fingerprint, CanonicalError>,
    {
        if let Some(hit) = self.get(key) {
            return Some(hit);
        }

        self.computations.fetch_add(1, Ordering::Relaxed);
        let computed = match compute() {
            Ok(fp) if fp.len > 0 => fp,
            Ok(_) => {
                tracing::debug!(version = %key.version, asset = %key.asset.canonical_file(), "canonical reference normalized to nothing");
                return None;
            }
            Err(e) => {
                tracing::debug!(version = %key.version, error = %e, "canonical reference unavailable");
                return None;
            }
        };

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        Some(entries.entry(key.clone()).or_insert(computed).clone())
    }
}
