//! Why a single chunk failed. Never fatal to the run.

use std::fmt;

#[derive(Debug)]
pub enum ChunkError {
    /// Curl reported an error (timeout, connection refused, DNS, etc.).
    Transport(curl::Error),
    /// Worker answered with a non-2xx status; `body` is its plain-text message.
    Http { status: u32, body: String },
    /// Body exceeded the configured response limit.
    ResponseTooLarge { limit: usize },
    /// Body was not a valid worker response (bad JSON, wrong categories,
    /// negative counts, inconsistent totals or echoes).
    Malformed(String),
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkError::Transport(e) => write!(f, "transport: {}", e),
            ChunkError::Http { status, body } if body.is_empty() => write!(f, "HTTP {}", status),
            ChunkError::Http { status, body } => write!(f, "HTTP {}: {}", status, body),
            ChunkError::ResponseTooLarge { limit } => {
                write!(f, "response larger than {} bytes", limit)
            }
            ChunkError::Malformed(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

impl std::error::Error for ChunkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChunkError::Transport(e) => Some(e),
            ChunkError::Http { .. }
            | ChunkError::ResponseTooLarge { .. }
            | ChunkError::Malformed(_) => None,
        }
    }
}

impl From<curl::Error> for ChunkError {
    fn from(e: curl::Error) -> Self {
        ChunkError::Transport(e)
    }
}
