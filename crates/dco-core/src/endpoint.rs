//! Worker endpoints and round-robin selection.
//!
//! The ring owns the only cursor. The dispatcher advances it once per chunk,
//! in chunk order, before a window's requests are spawned, so the
//! chunk-to-endpoint assignment is reproducible for a given run. Endpoints
//! that failed earlier are not skipped.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Address of one worker (an absolute HTTP/HTTPS URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Endpoint(Url);

impl Endpoint {
    /// Parse an endpoint URL. Only `http` and `https` are accepted.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: raw.to_string(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(ConfigError::InvalidEndpoint {
                endpoint: raw.to_string(),
                reason: format!("unsupported scheme {:?}", other),
            }),
        }
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Fixed, non-empty list of endpoints handed out in rotation.
#[derive(Debug, Clone)]
pub struct EndpointRing {
    endpoints: Vec<Endpoint>,
    cursor: usize,
}

impl EndpointRing {
    /// Fails with `ConfigError::NoEndpoints` when `endpoints` is empty.
    pub fn new(endpoints: Vec<Endpoint>) -> Result<Self, ConfigError> {
        if endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        Ok(Self {
            endpoints,
            cursor: 0,
        })
    }

    /// Returns the endpoint at the cursor and advances it, wrapping at the end.
    pub fn next(&mut self) -> Endpoint {
        let endpoint = self.endpoints[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.endpoints.len();
        endpoint
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
