//! Configuration errors: everything that must fail before any chunk is sent.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no worker endpoints configured")]
    NoEndpoints,

    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("batch size must be greater than zero")]
    ZeroBatchSize,

    #[error("resource name must not be empty")]
    EmptyResourceName,

    #[error("invalid storage_url {url:?}: {reason}")]
    InvalidStorageUrl { url: String, reason: String },

    #[error("no resource size given and no storage_url configured to probe it")]
    NoSizeSource,
}
