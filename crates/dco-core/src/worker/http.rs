//! `ChunkWorker` over HTTP GET with libcurl.

use std::time::Duration;

use url::Url;

use super::{parse_response, ChunkError, ChunkRequest, ChunkWorker, WorkerResponse};
use crate::endpoint::Endpoint;

/// Per-request transport limits. The timeouts are the only cancellation a
/// run has: a worker that never answers fails its chunk after `request_timeout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Skip TLS peer and host verification.
    pub insecure: bool,
    pub max_response_bytes: usize,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            request_timeout: Duration::from_secs(300),
            insecure: false,
            max_response_bytes: 1024 * 1024,
        }
    }
}

/// Sends each chunk as `GET <endpoint>?file_name=..&start=..&end=..`.
#[derive(Debug, Clone, Default)]
pub struct CurlWorker {
    options: TransportOptions,
}

impl CurlWorker {
    pub fn new(options: TransportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }
}

/// Endpoint URL with the request's query parameters appended to any it already has.
pub(crate) fn request_url(endpoint: &Endpoint, request: &ChunkRequest) -> Url {
    let mut url = endpoint.url().clone();
    {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in request.query_pairs() {
            pairs.append_pair(k, &v);
        }
    }
    url
}

impl ChunkWorker for CurlWorker {
    fn analyze(
        &self,
        endpoint: &Endpoint,
        request: &ChunkRequest,
    ) -> Result<WorkerResponse, ChunkError> {
        let url = request_url(endpoint, request);
        let limit = self.options.max_response_bytes;
        let mut body: Vec<u8> = Vec::new();
        let mut overflow = false;

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.timeout(self.options.request_timeout)?;
        if self.options.insecure {
            easy.ssl_verify_peer(false)?;
            easy.ssl_verify_host(false)?;
        }

        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                if body.len() + data.len() > limit {
                    overflow = true;
                    // Short write makes curl abort the transfer.
                    return Ok(0);
                }
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()
        };
        if let Err(e) = performed {
            if e.is_write_error() && overflow {
                return Err(ChunkError::ResponseTooLarge { limit });
            }
            return Err(ChunkError::Transport(e));
        }

        let status = easy.response_code()?;
        if !(200..300).contains(&status) {
            let text = String::from_utf8_lossy(&body).trim().to_string();
            return Err(ChunkError::Http { status, body: text });
        }

        parse_response(&body, request)
    }
}
