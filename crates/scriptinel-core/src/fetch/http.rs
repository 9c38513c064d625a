//! libcurl-backed fetcher.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::classify::{classify_curl_error, classify_http_status};
use super::error::FetchError;
use super::Fetch;
use crate::config::ScanConfig;

/// Per-request limits and identity, shared by every handle a fetcher creates.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub max_body_bytes: u64,
}

impl FetchOptions {
    pub fn from_config(cfg: &ScanConfig) -> Self {
        Self {
            user_agent: cfg.user_agent.clone(),
            connect_timeout: cfg.connect_timeout(),
            read_timeout: cfg.read_timeout(),
            max_body_bytes: cfg.max_body_bytes,
        }
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    opts: FetchOptions,
}

impl CurlFetcher {
    pub fn new(opts: FetchOptions) -> Self {
        Self { opts }
    }

    fn perform(&self, url: &str) -> Result<String, FetchError> {
        let curl_err = |e: curl::Error| classify_curl_error(url, &e);

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(curl_err)?;
        easy.useragent(&self.opts.user_agent).map_err(curl_err)?;
        easy.follow_location(true).map_err(curl_err)?;
        easy.max_redirections(10).map_err(curl_err)?;
        easy.connect_timeout(self.opts.connect_timeout)
            .map_err(curl_err)?;
        easy.timeout(self.opts.connect_timeout + self.opts.read_timeout)
            .map_err(curl_err)?;
        easy.accept_encoding("").map_err(curl_err)?;

        let limit = self.opts.max_body_bytes;
        let oversized = AtomicBool::new(false);
        let mut body: Vec<u8> = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    if body.len() as u64 + data.len() as u64 > limit {
                        oversized.store(true, Ordering::Relaxed);
                        return Ok(0); // abort transfer
                    }
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(curl_err)?;
            if let Err(e) = transfer.perform() {
                if oversized.load(Ordering::Relaxed) {
                    return Err(FetchError::Other {
                        url: url.to_string(),
                        detail: format!("body exceeds {} bytes", limit),
                    });
                }
                return Err(curl_err(e));
            }
        }

        let code = easy.response_code().map_err(curl_err)?;
        if let Some(err) = classify_http_status(url, code) {
            return Err(err);
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

impl Fetch for CurlFetcher {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        let result = self.perform(url);
        if let Err(e) = &result {
            tracing::trace!(error = %e, "fetch failed");
        }
        result
    }
}
