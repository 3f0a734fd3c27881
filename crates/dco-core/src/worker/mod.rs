//! Worker contract: one request per chunk, one JSON document back.
//!
//! The orchestrator only sees the `ChunkWorker` trait. `CurlWorker` is the
//! HTTP implementation; tests plug in fakes. Calls are blocking and run on
//! tokio's blocking pool, one per in-flight chunk.

mod error;
mod http;
mod parse;

pub use error::ChunkError;
pub use http::{CurlWorker, TransportOptions};
pub use parse::parse_response;

use serde::{Deserialize, Serialize};

use crate::aggregate::CategoryCounts;
use crate::endpoint::Endpoint;
use crate::planner::Chunk;

/// What a worker is asked to analyze: `[start, end)` of `file_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRequest {
    pub file_name: String,
    pub chunk: Chunk,
}

impl ChunkRequest {
    /// Query parameters sent to the worker, in order.
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("file_name", self.file_name.clone()),
            ("start", self.chunk.start.to_string()),
            ("end", self.chunk.end.to_string()),
        ]
    }
}

/// Success body returned by a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerResponse {
    pub verb_count: u64,
    pub detailed_counts: CategoryCounts,
    pub file_name: String,
    pub start: u64,
    pub end: u64,
    pub total_file_size: u64,
    pub execution_time_seconds: f64,
}

/// Something that can analyze one chunk at one endpoint.
///
/// Implementations block until the worker answers or the transport gives up.
/// Any failure is reported as a `ChunkError` and becomes a failed outcome.
pub trait ChunkWorker: Send + Sync {
    fn analyze(
        &self,
        endpoint: &Endpoint,
        request: &ChunkRequest,
    ) -> Result<WorkerResponse, ChunkError>;
}
