//! Map curl errors and HTTP status codes onto `FetchError`.

use super::error::FetchError;

/// Classify a curl error for the URL it occurred on.
pub fn classify_curl_error(url: &str, e: &curl::Error) -> FetchError {
    let url = url.to_string();
    if e.is_operation_timedout() {
        return FetchError::Timeout { url };
    }
    if e.is_ssl_connect_error()
        || e.is_peer_failed_verification()
        || e.is_ssl_certproblem()
        || e.is_ssl_cacert()
        || e.is_ssl_cipher()
    {
        return FetchError::Tls {
            url,
            detail: e.to_string(),
        };
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return FetchError::Connection {
            url,
            detail: e.to_string(),
        };
    }
    FetchError::Other {
        url,
        detail: e.to_string(),
    }
}

/// `None` for 2xx, otherwise the status error.
pub fn classify_http_status(url: &str, code: u32) -> Option<FetchError> {
    if (200..300).contains(&code) {
        return None;
    }
    Some(FetchError::Status {
        url: url.to_string(),
        status: code,
    })
}
