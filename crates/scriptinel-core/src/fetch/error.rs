//! Fetch failure taxonomy.

use thiserror::Error;

/// Error returned by a single GET.
///
/// `Timeout`, `Connection` and `Tls` mean the host could not be talked to;
/// `Status` means the host answered but does not serve the resource. Both are
/// unreachability, not evidence of tampering. `Other` is anything unexpected.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GET {url} timed out")]
    Timeout { url: String },
    #[error("GET {url}: connection failed: {detail}")]
    Connection { url: String, detail: String },
    #[error("GET {url}: TLS failure: {detail}")]
    Tls { url: String, detail: String },
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u32 },
    #[error("GET {url}: {detail}")]
    Other { url: String, detail: String },
}

impl FetchError {
    /// The host itself could not be reached; later requests to it will fail the same way.
    pub fn is_host_unreachable(&self) -> bool {
        matches!(
            self,
            FetchError::Timeout { .. } | FetchError::Connection { .. } | FetchError::Tls { .. }
        )
    }

    /// Recoverable unreachability of any kind (host or resource).
    pub fn is_unreachable(&self) -> bool {
        self.is_host_unreachable() || matches!(self, FetchError::Status { .. })
    }
}
