//! Chunk type and fixed-size range planning.

use serde::{Deserialize, Serialize};

/// A single chunk: byte range [start, end) (half-open) with its ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in the plan, starting at 0.
    pub id: usize,
    /// Start offset (inclusive).
    pub start: u64,
    /// End offset (exclusive).
    pub end: u64,
}

impl Chunk {
    /// Length of this chunk in bytes.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Builds a chunk plan covering `[0, resource_size)` in steps of `chunk_size`.
///
/// Every chunk is exactly `chunk_size` bytes except possibly the last one.
/// Returns an empty vec if `resource_size` is 0. A `chunk_size` of 0 also
/// yields an empty plan; `RunConfig` rejects it before planning.
pub fn plan_chunks(resource_size: u64, chunk_size: u64) -> Vec<Chunk> {
    if resource_size == 0 || chunk_size == 0 {
        return Vec::new();
    }

    let count = resource_size.div_ceil(chunk_size);
    let mut out = Vec::with_capacity(count as usize);
    let mut offset = 0u64;

    while offset < resource_size {
        let end = offset.saturating_add(chunk_size).min(resource_size);
        out.push(Chunk {
            id: out.len(),
            start: offset,
            end,
        });
        offset = end;
    }

    out
}

/// Consecutive windows of at most `batch_size` chunks, in plan order.
pub fn windows(chunks: &[Chunk], batch_size: usize) -> std::slice::Chunks<'_, Chunk> {
    chunks.chunks(batch_size.max(1))
}
