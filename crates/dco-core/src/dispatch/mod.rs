//! Batched concurrent dispatch of chunks to workers.
//!
//! Chunks go out in windows of at most `batch_size`. Every request of a
//! window runs on the blocking pool at the same time; the dispatcher waits
//! for the whole window to settle before sending the next one, so no more
//! than `batch_size` requests are ever in flight. Results come back over a
//! channel to this single consumer, which is the only place the aggregate
//! is mutated. A failed chunk is logged and recorded, never retried, and
//! never stops the run.

mod progress;

pub use progress::RunProgress;

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::aggregate::{AggregateState, Aggregator};
use crate::endpoint::{Endpoint, EndpointRing};
use crate::outcome::{ChunkOutcome, ChunkReport};
use crate::planner::{self, Chunk};
use crate::worker::{ChunkError, ChunkRequest, ChunkWorker, WorkerResponse};

/// Everything a finished dispatch produced.
#[derive(Debug, Clone)]
pub struct Dispatched {
    /// One entry per planned chunk, in plan order.
    pub reports: Vec<ChunkReport>,
    /// Final totals over the successful chunks.
    pub totals: AggregateState,
    pub failed: usize,
}

pub struct BatchDispatcher {
    file_name: String,
    ring: EndpointRing,
    worker: Arc<dyn ChunkWorker>,
    progress_tx: Option<mpsc::Sender<RunProgress>>,
}

impl BatchDispatcher {
    pub fn new(
        file_name: impl Into<String>,
        ring: EndpointRing,
        worker: Arc<dyn ChunkWorker>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            ring,
            worker,
            progress_tx: None,
        }
    }

    /// Publish a `RunProgress` after every settled chunk. Snapshots are
    /// dropped when the channel is full.
    pub fn with_progress(mut self, tx: mpsc::Sender<RunProgress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Dispatch `chunks` in windows of at most `batch_size` (0 is treated as 1).
    ///
    /// `chunks` may be any slice of a plan. A chunk whose id was already
    /// settled earlier in the run is reported as failed and adds nothing.
    pub async fn run(&mut self, chunks: &[Chunk], batch_size: usize) -> Dispatched {
        let started = Instant::now();
        let mut aggregator = Aggregator::for_chunks(chunks);
        let mut reports = Vec::with_capacity(chunks.len());
        let batch_size = batch_size.max(1);
        let batch_count = chunks.len().div_ceil(batch_size);

        for (batch_index, window) in planner::windows(chunks, batch_size).enumerate() {
            tracing::debug!(
                batch = batch_index,
                chunks = window.len(),
                "dispatching batch {}/{}",
                batch_index + 1,
                batch_count
            );
            let settled = self
                .run_window(window, &mut aggregator, &mut reports, started)
                .await;
            tracing::debug!(batch = batch_index, settled, "batch settled");
        }

        let totals = aggregator.snapshot();
        let failed = reports.iter().filter(|r| !r.outcome.is_success()).count();
        tracing::info!(
            chunks = chunks.len(),
            failed,
            total = totals.total,
            elapsed_secs = started.elapsed().as_secs_f64(),
            "dispatch finished"
        );
        Dispatched {
            reports,
            totals,
            failed,
        }
    }

    /// Sends one window and waits for all of it. Appends one report per chunk
    /// in window order and returns how many results arrived.
    async fn run_window(
        &mut self,
        window: &[Chunk],
        aggregator: &mut Aggregator,
        reports: &mut Vec<ChunkReport>,
        started: Instant,
    ) -> usize {
        let (tx, mut rx) =
            mpsc::channel::<(usize, Result<WorkerResponse, ChunkError>)>(window.len());
        let mut endpoints: Vec<Endpoint> = Vec::with_capacity(window.len());

        for (slot, chunk) in window.iter().enumerate() {
            let endpoint = self.ring.next();
            endpoints.push(endpoint.clone());
            tracing::info!(
                chunk_id = chunk.id,
                start = chunk.start,
                end = chunk.end,
                endpoint = %endpoint,
                "sending chunk"
            );
            let request = ChunkRequest {
                file_name: self.file_name.clone(),
                chunk: *chunk,
            };
            let worker = Arc::clone(&self.worker);
            let tx = tx.clone();
            tokio::task::spawn_blocking(move || {
                let res = worker.analyze(&endpoint, &request);
                // Capacity equals the window size, so this never waits.
                let _ = tx.blocking_send((slot, res));
            });
        }
        drop(tx);

        let mut outcomes: Vec<Option<ChunkOutcome>> = vec![None; window.len()];
        let mut received = 0usize;
        while let Some((slot, res)) = rx.recv().await {
            received += 1;
            let chunk = &window[slot];
            let outcome = match res {
                Ok(response) => {
                    tracing::info!(
                        chunk_id = chunk.id,
                        verb_count = response.verb_count,
                        execution_time_seconds = response.execution_time_seconds,
                        "chunk processed"
                    );
                    ChunkOutcome::Succeeded(response)
                }
                Err(e) => {
                    tracing::warn!(
                        chunk_id = chunk.id,
                        start = chunk.start,
                        end = chunk.end,
                        endpoint = %endpoints[slot],
                        error = %e,
                        "chunk failed"
                    );
                    ChunkOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            outcomes[slot] = Some(self.settle(aggregator, chunk.id, outcome, started));
        }

        // A worker that panicked dropped its sender without a result.
        for (slot, outcome) in outcomes.iter_mut().enumerate() {
            if outcome.is_none() {
                let chunk = &window[slot];
                tracing::warn!(
                    chunk_id = chunk.id,
                    endpoint = %endpoints[slot],
                    "worker task ended without a result"
                );
                let failed = ChunkOutcome::Failed {
                    reason: "worker task ended without a result".to_string(),
                };
                *outcome = Some(self.settle(aggregator, chunk.id, failed, started));
            }
        }

        for ((chunk, endpoint), outcome) in window.iter().zip(endpoints).zip(outcomes) {
            if let Some(outcome) = outcome {
                reports.push(ChunkReport {
                    chunk: *chunk,
                    endpoint,
                    outcome,
                });
            }
        }
        received
    }

    /// Absorbs `outcome` and returns what to report for the chunk. An outcome
    /// the aggregator refuses is reported as failed so the report never
    /// claims a success the totals do not contain.
    fn settle(
        &self,
        aggregator: &mut Aggregator,
        chunk_id: usize,
        outcome: ChunkOutcome,
        started: Instant,
    ) -> ChunkOutcome {
        if let Err(e) = aggregator.absorb(chunk_id, &outcome) {
            tracing::error!(chunk_id, error = %e, "outcome not absorbed");
            return ChunkOutcome::Failed {
                reason: e.to_string(),
            };
        }
        if let Some(tx) = &self.progress_tx {
            let _ = tx.try_send(RunProgress {
                chunks_settled: aggregator.settled(),
                chunk_count: aggregator.chunk_count(),
                chunks_failed: aggregator.failed(),
                totals: aggregator.snapshot(),
                elapsed_secs: started.elapsed().as_secs_f64(),
            });
        }
        outcome
    }
}
