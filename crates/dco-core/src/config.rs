use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::endpoint::{Endpoint, EndpointRing};
use crate::error::ConfigError;
use crate::worker::TransportOptions;

/// Transport parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Seconds allowed to establish a connection to a worker or the store.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for one whole request, including the worker's analysis.
    pub request_timeout_secs: u64,
    /// Skip TLS certificate verification (self-signed worker deployments).
    #[serde(default)]
    pub insecure: bool,
    /// Largest worker response body accepted, in bytes.
    pub max_response_bytes: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        let d = TransportOptions::default();
        Self {
            connect_timeout_secs: d.connect_timeout.as_secs(),
            request_timeout_secs: d.request_timeout.as_secs(),
            insecure: d.insecure,
            max_response_bytes: d.max_response_bytes,
        }
    }
}

impl TransportConfig {
    pub fn to_options(&self) -> TransportOptions {
        TransportOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            insecure: self.insecure,
            max_response_bytes: self.max_response_bytes,
        }
    }
}

/// Global configuration loaded from `~/.config/dco/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DcoConfig {
    /// Bytes per chunk.
    pub chunk_size: u64,
    /// Maximum chunks in flight at once (one window).
    pub batch_size: usize,
    /// Worker endpoints, used round-robin in this order.
    pub endpoints: Vec<String>,
    /// Base URL of the blob container; the resource size is probed with
    /// HEAD `<storage_url>/<file name>` when no size is given.
    #[serde(default)]
    pub storage_url: Option<String>,
    /// Optional transport section; if missing, built-in defaults are used.
    #[serde(default)]
    pub transport: Option<TransportConfig>,
}

impl Default for DcoConfig {
    fn default() -> Self {
        Self {
            chunk_size: 100_000,
            batch_size: 20,
            endpoints: vec!["http://127.0.0.1:7071/api/count_verbs".to_string()],
            storage_url: None,
            transport: None,
        }
    }
}

/// Per-invocation overrides (CLI flags). Empty/None fields keep the file value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub endpoints: Vec<String>,
    pub chunk_size: Option<u64>,
    pub batch_size: Option<usize>,
    pub storage_url: Option<String>,
    pub insecure: bool,
}

impl DcoConfig {
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if !overrides.endpoints.is_empty() {
            self.endpoints = overrides.endpoints.clone();
        }
        if let Some(n) = overrides.chunk_size {
            self.chunk_size = n;
        }
        if let Some(n) = overrides.batch_size {
            self.batch_size = n;
        }
        if let Some(u) = &overrides.storage_url {
            self.storage_url = Some(u.clone());
        }
        if overrides.insecure {
            self.transport.get_or_insert_with(TransportConfig::default).insecure = true;
        }
    }

    /// Validate into the immutable settings of one run. Fails before any I/O.
    pub fn to_run_config(&self) -> Result<RunConfig, ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        let endpoints = self
            .endpoints
            .iter()
            .map(|e| Endpoint::parse(e))
            .collect::<Result<Vec<_>, _>>()?;
        if endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        let storage_url = self
            .storage_url
            .as_deref()
            .map(|u| {
                Url::parse(u).map_err(|e| ConfigError::InvalidStorageUrl {
                    url: u.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;
        Ok(RunConfig {
            chunk_size: self.chunk_size,
            batch_size: self.batch_size,
            endpoints,
            storage_url,
            transport: self.transport.clone().unwrap_or_default().to_options(),
        })
    }
}

/// Validated settings for one run; immutable once built.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub chunk_size: u64,
    pub batch_size: usize,
    pub endpoints: Vec<Endpoint>,
    pub storage_url: Option<Url>,
    pub transport: TransportOptions,
}

impl RunConfig {
    /// Fresh selector with the cursor at the first endpoint.
    pub fn endpoint_ring(&self) -> Result<EndpointRing, ConfigError> {
        EndpointRing::new(self.endpoints.clone())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dco")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DcoConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<DcoConfig> {
    if !path.exists() {
        let default_cfg = DcoConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: DcoConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
