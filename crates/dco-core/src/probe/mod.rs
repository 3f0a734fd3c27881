//! Resource-size discovery before planning.
//!
//! Uses the curl crate (libcurl) to send a HEAD request for the resource and
//! read `Content-Length`. A run cannot be planned without a size, so every
//! failure here is fatal to the run.

mod parse;

use anyhow::{Context, Result};
use std::str;
use url::Url;

use crate::error::ConfigError;
use crate::worker::TransportOptions;

/// Result of a HEAD request: the size plus validators worth logging.
#[derive(Debug, Clone)]
pub struct HeadResult {
    /// Total size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
}

/// Where the resource size comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeSource {
    /// Size known up front (e.g. `--size`); no I/O.
    Fixed(u64),
    /// HEAD this URL and use its `Content-Length`.
    Head(Url),
}

impl SizeSource {
    /// Pick a source: an explicit size wins, otherwise HEAD
    /// `<storage_url>/<file_name>`.
    pub fn choose(
        size: Option<u64>,
        storage_url: Option<&Url>,
        file_name: &str,
    ) -> Result<Self, ConfigError> {
        if let Some(size) = size {
            return Ok(SizeSource::Fixed(size));
        }
        let base = storage_url.ok_or(ConfigError::NoSizeSource)?;
        Ok(SizeSource::Head(resource_url(base, file_name)))
    }
}

/// `base` with `file_name` appended as one path segment; query (e.g. a SAS
/// token) is kept.
pub fn resource_url(base: &Url, file_name: &str) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(file_name);
    }
    url
}

/// Performs a HEAD request and returns parsed metadata.
///
/// Follows redirects. Runs in the current thread; `resolve_size` calls it
/// from `spawn_blocking`.
pub fn probe(url: &Url, options: &TransportOptions) -> Result<HeadResult> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url.as_str()).context("invalid URL")?;
    easy.nobody(true)?; // HEAD request
    easy.follow_location(true)?;
    easy.connect_timeout(options.connect_timeout)?;
    easy.timeout(options.request_timeout)?;
    if options.insecure {
        easy.ssl_verify_peer(false)?;
        easy.ssl_verify_host(false)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.perform().context("HEAD request failed")?;
    }

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        anyhow::bail!("HEAD {} returned HTTP {}", url, code);
    }

    Ok(parse::parse_headers(&headers))
}

/// Resolve the resource size for a run.
pub async fn resolve_size(source: &SizeSource, options: TransportOptions) -> Result<u64> {
    let url = match source {
        SizeSource::Fixed(size) => return Ok(*size),
        SizeSource::Head(url) => url.clone(),
    };

    let head = tokio::task::spawn_blocking({
        let url = url.clone();
        move || probe(&url, &options)
    })
    .await
    .context("probe task join")?
    .with_context(|| format!("size probe for {}", url))?;

    let size = head
        .content_length
        .ok_or_else(|| anyhow::anyhow!("{} did not send Content-Length", url))?;
    tracing::info!(
        size,
        etag = head.etag.as_deref().unwrap_or("-"),
        last_modified = head.last_modified.as_deref().unwrap_or("-"),
        "resource size {} bytes",
        size
    );
    Ok(size)
}
