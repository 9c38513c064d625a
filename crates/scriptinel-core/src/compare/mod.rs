//! Served-vs-canonical comparison of a single asset.
//!
//! Exact digest equality is too strict for what real hosts serve, so a
//! mismatch goes through a short ladder before it is reported:
//! 1. equal normalized digests → match,
//! 2. minified name, but the full build is what matches upstream → match,
//! 3. normalized lengths within `length_tolerance` → match,
//! 4. otherwise mismatch.
//!
//! Unreachable hosts, missing files, HTML error pages and unavailable
//! canonical references are skips, never mismatches.

mod canonical;
mod outcome;

pub use canonical::CanonicalSource;
pub use outcome::{Comparison, MatchKind, Outcome, SkipReason};

use std::sync::Arc;

use crate::cache::{CacheKey, CanonicalError, FingerprintCache};
use crate::config::ScanConfig;
use crate::fetch::{Fetch, FetchError};
use crate::fingerprint::Fingerprint;
use crate::library::{AssetSpec, Library, Variant, VersionKey};
use crate::normalize::Normalizer;
use crate::site::Site;
use crate::version::{self, Resolved};

pub struct Comparator<F> {
    fetcher: F,
    normalizer: Normalizer,
    canonical: CanonicalSource,
    cache: Arc<FingerprintCache>,
    length_tolerance: usize,
}

impl<F: Fetch> Comparator<F> {
    pub fn new(fetcher: F, cache: Arc<FingerprintCache>, cfg: &ScanConfig) -> Self {
        Self {
            fetcher,
            normalizer: Normalizer::with_extra_artifacts(&cfg.extra_benign_artifacts),
            canonical: CanonicalSource::new(cfg.canonical_or_default()),
            cache,
            length_tolerance: cfg.length_tolerance,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn cache(&self) -> &FingerprintCache {
        &self.cache
    }

    /// Version declared by the site's home page (WooCommerce generator tag).
    ///
    /// Errors are returned as-is; the caller decides whether the site is
    /// unreachable or broken.
    pub fn page_version(&self, site: &Site) -> Result<Resolved<VersionKey>, FetchError> {
        let page = self.fetcher.get(site.as_str())?;
        Ok(version::resolve_woocommerce(&page))
    }

    /// Compare one asset of `site`.
    ///
    /// `page_version` is the site-wide version for page-versioned libraries;
    /// for jQuery it is `None` and the version is read from the served script.
    /// Only unexpected fetch failures are returned as `Err`.
    pub fn compare(
        &self,
        site: &Site,
        asset: &AssetSpec,
        page_version: Option<&VersionKey>,
    ) -> Result<Comparison, FetchError> {
        let served_url = site.join(&asset.served_file());
        let raw = match self.fetcher.get(&served_url) {
            Ok(body) => body,
            Err(e) => return skip_unreachable(served_url, e),
        };
        if raw.trim().is_empty() {
            return Ok(Comparison::skip(served_url, SkipReason::Blank));
        }
        if looks_like_html(&raw) {
            return Ok(Comparison::skip(served_url, SkipReason::HtmlFallback));
        }

        let (version, canonical_asset) = match (page_version, asset.library) {
            (Some(v), _) => (v.clone(), asset.clone()),
            (None, Library::Jquery) => match version::resolve_jquery(&raw) {
                Resolved::Found(found) => (found.key(), asset.with_variant(found.variant)),
                Resolved::NotFound => {
                    return Ok(Comparison::skip(served_url, SkipReason::VersionNotFound))
                }
            },
            (None, Library::Woocommerce) => {
                return Ok(Comparison::skip(served_url, SkipReason::VersionNotFound))
            }
        };

        let served = Fingerprint::of_raw(&self.normalizer, &raw);
        let Some(canonical) = self.canonical_fingerprint(&version, &canonical_asset) else {
            return Ok(Comparison::skip(served_url, SkipReason::CanonicalUnavailable));
        };

        let outcome = self.ladder(site, &version, asset, &canonical_asset, &served, &canonical);
        match outcome {
            Outcome::Mismatch => tracing::warn!(
                url = %served_url,
                version = %version,
                served_digest = %served.digest,
                served_len = served.len,
                canonical_digest = %canonical.digest,
                canonical_len = canonical.len,
                "served script differs from canonical reference"
            ),
            _ => tracing::debug!(url = %served_url, version = %version, %outcome, "compared"),
        }
        Ok(Comparison::new(served_url, outcome))
    }

    fn ladder(
        &self,
        site: &Site,
        version: &VersionKey,
        served_asset: &AssetSpec,
        canonical_asset: &AssetSpec,
        served: &Fingerprint,
        canonical: &Fingerprint,
    ) -> Outcome {
        if served.digest == canonical.digest {
            return Outcome::Match(MatchKind::Exact);
        }
        if served_asset.variant == Variant::Minified
            && canonical_asset.variant == Variant::Minified
            && self.expanded_build_matches(site, version, served_asset, canonical_asset, served)
        {
            return Outcome::Match(MatchKind::ExpandedMinified);
        }
        if served.len_diff(canonical) < self.length_tolerance {
            return Outcome::Match(MatchKind::WithinTolerance);
        }
        Outcome::Mismatch
    }

    /// Some hosts serve the full build under the minified name. Accept when
    /// the served copy, or failing that the site's full-name copy, matches
    /// the full canonical build.
    fn expanded_build_matches(
        &self,
        site: &Site,
        version: &VersionKey,
        served_asset: &AssetSpec,
        canonical_asset: &AssetSpec,
        served: &Fingerprint,
    ) -> bool {
        let Some(full_canonical) =
            self.canonical_fingerprint(version, &canonical_asset.with_variant(Variant::Full))
        else {
            return false;
        };
        if served.digest == full_canonical.digest {
            return true;
        }

        let full_url = site.join(&served_asset.with_variant(Variant::Full).served_file());
        match self.fetcher.get(&full_url) {
            Ok(body) if !body.trim().is_empty() && !looks_like_html(&body) => {
                Fingerprint::of_raw(&self.normalizer, &body).digest == full_canonical.digest
            }
            Ok(_) => false,
            Err(e) => {
                tracing::debug!(url = %full_url, error = %e, "full build refetch failed");
                false
            }
        }
    }

    fn canonical_fingerprint(&self, version: &VersionKey, asset: &AssetSpec) -> Option<Fingerprint> {
        let key = CacheKey::new(version, asset);
        self.cache.get_or_compute(&key, || {
            let url = self.canonical.url(version, asset);
            let body = self.fetcher.get(&url)?;
            let fp = Fingerprint::of_raw(&self.normalizer, &body);
            if fp.len == 0 {
                return Err(CanonicalError::Blank { url });
            }
            Ok(fp)
        })
    }
}

fn skip_unreachable(url: String, e: FetchError) -> Result<Comparison, FetchError> {
    match e {
        FetchError::Status { status, .. } => Ok(Comparison::skip(url, SkipReason::NotServed(status))),
        e if e.is_host_unreachable() => Ok(Comparison::skip(url, SkipReason::Unreachable)),
        e => Err(e),
    }
}

/// A script URL answered with an HTML page (soft 404, login wall, etc.).
fn looks_like_html(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    lower.contains("</body>") || lower.contains("</html>")
}
