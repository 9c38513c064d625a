//! HTTP GET of served assets, home pages and canonical references.
//!
//! The comparator only depends on the `Fetch` trait; `CurlFetcher` is the
//! libcurl-backed implementation used by the CLI. Fetches are blocking and
//! run on tokio's blocking pool, one site per worker.

mod classify;
mod error;
mod http;

pub use self::classify::{classify_curl_error, classify_http_status};
pub use self::http::{CurlFetcher, FetchOptions};
pub use self::error::FetchError;

/// Blocking GET returning the body as text (lossy UTF-8).
pub trait Fetch: Send + Sync {
    fn get(&self, url: &str) -> Result<String, FetchError>;
}
