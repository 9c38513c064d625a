//! Content fingerprints: SHA-256 of normalized script text plus its length.
//!
//! The length rides along with the digest because the comparator tolerates
//! small length differences when digests disagree.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use crate::normalize::Normalizer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    /// Lowercase hex SHA-256 of the normalized text.
    pub digest: String,
    /// Byte length of the normalized text.
    pub len: usize,
}

impl Fingerprint {
    /// Fingerprint already-normalized text.
    pub fn of_normalized(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        Self {
            digest: hex::encode(hasher.finalize()),
            len: text.len(),
        }
    }

    /// Normalize `raw` and fingerprint the result.
    pub fn of_raw(normalizer: &Normalizer, raw: &str) -> Self {
        Self::of_normalized(&normalizer.normalize(raw))
    }

    /// Absolute difference between the normalized lengths.
    pub fn len_diff(&self, other: &Fingerprint) -> usize {
        self.len.abs_diff(other.len)
    }
}

/// Fingerprint a script on disk (lossy UTF-8 decoding, like fetched bodies).
pub fn fingerprint_path(normalizer: &Normalizer, path: &Path) -> Result<Fingerprint> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok(Fingerprint::of_raw(normalizer, &String::from_utf8_lossy(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_text_digest() {
        let fp = Fingerprint::of_normalized("");
        assert_eq!(
            fp.digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(fp.len, 0);
    }

    #[test]
    fn raw_fingerprint_ignores_layout() {
        let n = Normalizer::default();
        let a = Fingerprint::of_raw(&n, "var a = 1;\nvar b = 2;\n");
        let b = Fingerprint::of_raw(&n, "var a=1;   var b=2;");
        assert_eq!(a, b);
        assert_eq!(a.len, "vara=1;varb=2;".len());
    }

    #[test]
    fn len_diff_is_symmetric() {
        let a = Fingerprint::of_normalized("abcdef");
        let b = Fingerprint::of_normalized("abc");
        assert_eq!(a.len_diff(&b), 3);
        assert_eq!(b.len_diff(&a), 3);
    }

    #[test]
    fn fingerprint_path_matches_in_memory() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello ();\n").unwrap();
        f.flush().unwrap();
        let n = Normalizer::default();
        let on_disk = fingerprint_path(&n, f.path()).unwrap();
        assert_eq!(on_disk, Fingerprint::of_raw(&n, "hello();"));
    }
}
