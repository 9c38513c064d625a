//! Result of comparing one served asset against its canonical reference.

use std::fmt;

use crate::sink::{RecordStatus, ScanResultRecord};

/// Which rung of the tolerance ladder accepted the served copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Normalized digests are equal.
    Exact,
    /// Minified name serves the full build, which matches the full canonical.
    ExpandedMinified,
    /// Digests differ but normalized lengths are within tolerance.
    WithinTolerance,
}

/// Why an asset produced no verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Host could not be reached (DNS, connect, TLS, timeout).
    Unreachable,
    /// Host answered with a non-2xx status.
    NotServed(u32),
    /// Empty body.
    Blank,
    /// An HTML page came back where a script was expected.
    HtmlFallback,
    /// No version marker in the served script.
    VersionNotFound,
    /// Canonical reference could not be fetched.
    CanonicalUnavailable,
}

impl SkipReason {
    /// The host itself failed; counts against it in the problematic-host tally.
    /// A missing asset on a live host does not.
    pub fn is_unreachable(self) -> bool {
        matches!(self, SkipReason::Unreachable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Match(MatchKind),
    Mismatch,
    Skip(SkipReason),
}

impl Outcome {
    pub fn is_match(self) -> bool {
        matches!(self, Outcome::Match(_))
    }

    /// Persisted status; skips are not persisted.
    pub fn status(self) -> Option<RecordStatus> {
        match self {
            Outcome::Match(_) => Some(RecordStatus::Ok),
            Outcome::Mismatch => Some(RecordStatus::Mismatch),
            Outcome::Skip(_) => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Match(kind) => write!(f, "match ({:?})", kind),
            Outcome::Mismatch => f.write_str("mismatch"),
            Outcome::Skip(reason) => write!(f, "skip ({:?})", reason),
        }
    }
}

/// Outcome for one `(site, asset)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub asset_url: String,
    pub outcome: Outcome,
}

impl Comparison {
    pub fn new(asset_url: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            asset_url: asset_url.into(),
            outcome,
        }
    }

    pub fn skip(asset_url: impl Into<String>, reason: SkipReason) -> Self {
        Self::new(asset_url, Outcome::Skip(reason))
    }

    pub fn record(&self) -> Option<ScanResultRecord> {
        self.outcome.status().map(|status| ScanResultRecord {
            asset_url: self.asset_url.clone(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_are_not_persisted() {
        let c = Comparison::skip("https://a/x.js", SkipReason::Blank);
        assert!(c.record().is_none());
    }

    #[test]
    fn verdicts_are_persisted() {
        let ok = Comparison::new("https://a/x.js", Outcome::Match(MatchKind::WithinTolerance));
        assert_eq!(ok.record().unwrap().status, RecordStatus::Ok);
        let bad = Comparison::new("https://a/x.js", Outcome::Mismatch);
        let rec = bad.record().unwrap();
        assert_eq!(rec.status, RecordStatus::Mismatch);
        assert_eq!(rec.asset_url, "https://a/x.js");
    }

    #[test]
    fn unreachable_reasons() {
        assert!(SkipReason::Unreachable.is_unreachable());
        assert!(!SkipReason::NotServed(404).is_unreachable());
        assert!(!SkipReason::NotServed(500).is_unreachable());
        assert!(!SkipReason::CanonicalUnavailable.is_unreachable());
        assert!(!SkipReason::HtmlFallback.is_unreachable());
    }
}
