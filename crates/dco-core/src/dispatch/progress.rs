//! Progress reporting for a run (chunks settled, failures, running totals).
//!
//! Sent by the dispatcher after every absorbed outcome; consumers can compute
//! rate = chunks_settled / elapsed_secs and ETA from the remaining chunks.

use crate::aggregate::AggregateState;

/// Snapshot of a run in progress (CLI-friendly).
#[derive(Debug, Clone)]
pub struct RunProgress {
    /// Chunks with an outcome so far (successes and failures).
    pub chunks_settled: usize,
    /// Total number of planned chunks.
    pub chunk_count: usize,
    /// Chunks that failed so far.
    pub chunks_failed: usize,
    /// Aggregate totals at the time of the snapshot.
    pub totals: AggregateState,
    /// Elapsed time since dispatch started (seconds).
    pub elapsed_secs: f64,
}

impl RunProgress {
    /// Settle rate in chunks per second (0 if elapsed is 0).
    pub fn chunks_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.chunks_settled as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if rate is 0 or already done).
    pub fn eta_secs(&self) -> Option<f64> {
        let remaining = self.chunk_count.saturating_sub(self.chunks_settled);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.chunks_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.chunk_count == 0 {
            return 1.0;
        }
        (self.chunks_settled as f64 / self.chunk_count as f64).min(1.0)
    }

    pub fn is_done(&self) -> bool {
        self.chunks_settled >= self.chunk_count
    }
}
