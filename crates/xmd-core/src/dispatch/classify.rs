//! Classify HTTP statuses and curl errors into retry kinds.

use super::error::FetchError;
use super::policy::ErrorKind;
use super::request::Response;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 => ErrorKind::Throttled,
        _ => ErrorKind::Other,
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_ssl_connect_error()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

/// Classify a finished dispatch: a response by its status, a failure by its kind.
pub fn classify(outcome: &Result<Response, FetchError>) -> ErrorKind {
    match outcome {
        Ok(resp) => classify_http_status(resp.status),
        Err(e) => e.kind(),
    }
}
