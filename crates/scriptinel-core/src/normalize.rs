//! Script canonicalization before fingerprinting.
//!
//! Served copies routinely differ from the published release in layout only:
//! re-indented, CRLF line endings, a dropped source-map comment, an appended
//! `jQuery.noConflict();`. The normalizer erases those differences so the
//! digest reflects the executable content.
//!
//! One pass is:
//! 1. strip benign artifacts (exact substrings),
//! 2. remove whitespace (space, tab, CR, LF, VT, FF),
//! 3. remove every `//` token, so a served file that only comments code out
//!    still compares against the canonical body,
//! 4. trim residual (non-ASCII) whitespace at the ends.
//!
//! Passes repeat until the text stops changing. A pass never lengthens its
//! input, so the loop terminates, and the fixed point makes `normalize`
//! idempotent even for artifacts that only become verbatim once whitespace
//! inside them is gone.

/// Fragments that appear in served copies but not in the canonical release.
pub const DEFAULT_BENIGN_ARTIFACTS: &[&str] = &[
    "//# sourceMappingURL=jquery.min.map",
    "//# sourceMappingURL=jquery.map",
    "jQuery.noConflict();",
];

const COMMENT_TOKEN: &str = "//";

#[derive(Debug, Clone)]
pub struct Normalizer {
    artifacts: Vec<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::with_extra_artifacts(&[])
    }
}

impl Normalizer {
    /// Default artifacts plus `extra` (e.g. from config). Empty entries are ignored.
    pub fn with_extra_artifacts(extra: &[String]) -> Self {
        let artifacts = DEFAULT_BENIGN_ARTIFACTS
            .iter()
            .map(|s| s.to_string())
            .chain(extra.iter().filter(|s| !s.is_empty()).cloned())
            .collect();
        Self { artifacts }
    }

    pub fn normalize(&self, raw: &str) -> String {
        let mut current = self.pass(raw);
        loop {
            let next = self.pass(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn pass(&self, text: &str) -> String {
        let mut stripped = text.to_string();
        for artifact in &self.artifacts {
            if stripped.contains(artifact.as_str()) {
                stripped = stripped.replace(artifact.as_str(), "");
            }
        }
        let compact: String = stripped.chars().filter(|c| !is_layout_whitespace(*c)).collect();
        compact.replace(COMMENT_TOKEN, "").trim().to_string()
    }
}

/// Normalize with the default artifact set.
pub fn normalize(raw: &str) -> String {
    Normalizer::default().normalize(raw)
}

fn is_layout_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{0B}' | '\u{0C}')
}
