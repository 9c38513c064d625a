//! One site's unit of work: sequential, paced comparisons of every asset.

use std::time::Duration;

use crate::compare::{Comparator, Outcome, SkipReason};
use crate::fetch::{Fetch, FetchError};
use crate::library::Library;
use crate::site::Site;
use crate::sink::RecordSender;
use crate::version::Resolved;

use super::stats::SiteReport;

/// Compare every asset of `library` on `site`, pushing verdicts to `records`.
///
/// Stops early when the host itself is unreachable. Unexpected fetch
/// failures are returned; records already sent stay persisted.
pub(super) fn scan_site<F: Fetch>(
    comparator: &Comparator<F>,
    site: &Site,
    library: Library,
    pacing: Duration,
    records: &RecordSender,
) -> Result<SiteReport, FetchError> {
    let mut report = SiteReport::default();

    let page_version = if library.versioned_by_page() {
        match comparator.page_version(site) {
            Ok(Resolved::Found(version)) => Some(version),
            Ok(Resolved::NotFound) => {
                tracing::debug!(site = %site, "no {} version on home page", library);
                return Ok(report);
            }
            Err(e) if e.is_unreachable() => {
                tracing::debug!(site = %site, error = %e, "home page unreachable");
                report.unreachable = true;
                return Ok(report);
            }
            Err(e) => return Err(e),
        }
    } else {
        None
    };

    for asset in library.assets() {
        let comparison = comparator.compare(site, &asset, page_version.as_ref())?;
        report.tally(comparison.outcome);
        if let Some(record) = comparison.record() {
            if !records.send(record) {
                tracing::warn!(url = %comparison.asset_url, "result sink closed; record dropped");
            }
        }
        if comparison.outcome == Outcome::Skip(SkipReason::Unreachable) {
            break;
        }
        if !pacing.is_zero() {
            std::thread::sleep(pacing);
        }
    }

    Ok(report)
}
