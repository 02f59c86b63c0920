//! Network seam of the dispatcher.
//!
//! Production traffic goes through libcurl on the blocking pool; tests plug in
//! scripted transports.

use async_trait::async_trait;
use std::str;
use std::time::Duration;

use super::classify::classify_curl_error;
use super::error::FetchError;
use super::policy::ErrorKind;
use super::request::{CachePolicy, Request, Response};

/// Executes one request to completion.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &Request) -> Result<Response, FetchError>;
}

/// libcurl-backed GET transport.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
}

impl CurlTransport {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(15))
    }
}

#[async_trait]
impl Transport for CurlTransport {
    async fn execute(&self, request: &Request) -> Result<Response, FetchError> {
        let request = request.clone();
        let connect_timeout = self.connect_timeout;
        tokio::task::spawn_blocking(move || perform_get(&request, connect_timeout))
            .await
            .map_err(|e| FetchError::transport(ErrorKind::Other, format!("transport task join: {e}")))?
    }
}

fn curl_err(e: curl::Error) -> FetchError {
    FetchError::transport(classify_curl_error(&e), e.to_string())
}

/// Blocking GET that buffers the whole body. Follows redirects; only the
/// headers of the final hop are kept.
fn perform_get(request: &Request, connect_timeout: Duration) -> Result<Response, FetchError> {
    let mut header_lines: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(request.url()).map_err(curl_err)?;
    easy.get(true).map_err(curl_err)?;
    easy.follow_location(true).map_err(curl_err)?;
    easy.max_redirections(10).map_err(curl_err)?;
    easy.connect_timeout(connect_timeout).map_err(curl_err)?;
    // Empty string: accept every encoding libcurl can decode.
    easy.accept_encoding("").map_err(curl_err)?;

    let mut list = curl::easy::List::new();
    for (k, v) in request.headers() {
        list.append(&format!("{}: {}", k.trim(), v.trim()))
            .map_err(curl_err)?;
    }
    if request.cache_policy() == Some(CachePolicy::NoStore) {
        list.append("Cache-Control: no-store").map_err(curl_err)?;
    }
    easy.http_headers(list).map_err(curl_err)?;

    {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    let line = s.trim_end();
                    if line.starts_with("HTTP/") {
                        header_lines.clear();
                    } else if !line.is_empty() {
                        header_lines.push(line.to_string());
                    }
                }
                true
            })
            .map_err(curl_err)?;
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(curl_err)?;
        transfer.perform().map_err(curl_err)?;
    }

    let status = easy.response_code().map_err(curl_err)?;
    let headers = header_lines
        .iter()
        .filter_map(|line| {
            let (name, value) = line.split_once(':')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect();

    Ok(Response {
        status,
        headers,
        body,
    })
}
