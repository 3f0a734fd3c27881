//! Running totals over a run's settled chunks.
//!
//! The dispatcher is the single owner of the `Aggregator` and absorbs
//! outcomes one at a time as they arrive, so no locking is needed here.
//! Every chunk id is absorbed at most once; a second attempt is rejected
//! and leaves the totals untouched.

mod counts;
mod settled;

pub use counts::{Category, CategoryCounts};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::outcome::ChunkOutcome;
use crate::planner::Chunk;
use settled::SettledSet;

/// Totals across all successful outcomes absorbed so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateState {
    pub total: u64,
    pub per_category: CategoryCounts,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("chunk {0} was already absorbed")]
    Duplicate(usize),
    #[error("chunk {id} is outside the plan (ids below {id_bound})")]
    OutOfPlan { id: usize, id_bound: usize },
}

#[derive(Debug, Clone)]
pub struct Aggregator {
    state: AggregateState,
    settled: SettledSet,
    chunk_count: usize,
    failed: usize,
}

impl Aggregator {
    /// Aggregator for a plan of `chunk_count` chunks (ids `0..chunk_count`).
    pub fn new(chunk_count: usize) -> Self {
        Self {
            state: AggregateState::default(),
            settled: SettledSet::new(chunk_count),
            chunk_count,
            failed: 0,
        }
    }

    /// Aggregator for an arbitrary set of chunks, e.g. a slice of a plan.
    /// Ids may start above zero; each one is still absorbed at most once.
    pub fn for_chunks(chunks: &[Chunk]) -> Self {
        let id_bound = chunks.iter().map(|c| c.id + 1).max().unwrap_or(0);
        Self {
            state: AggregateState::default(),
            settled: SettledSet::new(id_bound),
            chunk_count: chunks.len(),
            failed: 0,
        }
    }

    /// Absorb the outcome of chunk `chunk_id`.
    ///
    /// A success adds its per-category counts and their sum; a failure only
    /// marks the chunk settled.
    pub fn absorb(
        &mut self,
        chunk_id: usize,
        outcome: &ChunkOutcome,
    ) -> Result<(), AggregateError> {
        if !self.settled.in_plan(chunk_id) {
            return Err(AggregateError::OutOfPlan {
                id: chunk_id,
                id_bound: self.settled.id_bound(),
            });
        }
        if !self.settled.insert(chunk_id) {
            return Err(AggregateError::Duplicate(chunk_id));
        }
        match outcome {
            ChunkOutcome::Succeeded(response) => {
                let counts = &response.detailed_counts;
                self.state.per_category.add(counts);
                self.state.total = self.state.total.saturating_add(counts.sum());
            }
            ChunkOutcome::Failed { .. } => self.failed += 1,
        }
        Ok(())
    }

    pub fn snapshot(&self) -> AggregateState {
        self.state
    }

    /// Number of chunks absorbed so far (successes and failures).
    pub fn settled(&self) -> usize {
        self.settled.len()
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    pub fn is_complete(&self) -> bool {
        self.settled.len() == self.chunk_count
    }
}
