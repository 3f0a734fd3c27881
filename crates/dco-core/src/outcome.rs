//! Per-chunk outcomes: an explicit success or failure for every planned chunk.

use serde::{Deserialize, Serialize};

use crate::endpoint::Endpoint;
use crate::planner::Chunk;
use crate::worker::WorkerResponse;

/// Result of dispatching one chunk. A failure carries no partial counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChunkOutcome {
    Succeeded(WorkerResponse),
    Failed { reason: String },
}

impl ChunkOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ChunkOutcome::Succeeded(_))
    }

    pub fn response(&self) -> Option<&WorkerResponse> {
        match self {
            ChunkOutcome::Succeeded(r) => Some(r),
            ChunkOutcome::Failed { .. } => None,
        }
    }
}

/// One line of the run report: the chunk, where it was sent, what came back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkReport {
    pub chunk: Chunk,
    pub endpoint: Endpoint,
    pub outcome: ChunkOutcome,
}
