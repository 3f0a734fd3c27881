//! `dco plan <size>` – print the chunk plan and endpoint assignment (no I/O).

use anyhow::Result;
use dco_core::config::{ConfigOverrides, DcoConfig};
use dco_core::endpoint::Endpoint;
use dco_core::planner::{plan_chunks, windows, Chunk};

/// One planned chunk with the batch it goes out in and its endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlanRow {
    pub chunk: Chunk,
    pub batch: usize,
    pub endpoint: Endpoint,
}

pub(crate) fn plan_rows(
    mut cfg: DcoConfig,
    overrides: &ConfigOverrides,
    size: u64,
) -> Result<Vec<PlanRow>> {
    cfg.apply(overrides);
    let run = cfg.to_run_config()?;
    let mut ring = run.endpoint_ring()?;
    let chunks = plan_chunks(size, run.chunk_size);
    let mut rows = Vec::with_capacity(chunks.len());
    for (batch, window) in windows(&chunks, run.batch_size).enumerate() {
        for chunk in window {
            rows.push(PlanRow {
                chunk: *chunk,
                batch,
                endpoint: ring.next(),
            });
        }
    }
    Ok(rows)
}

pub fn run_plan(cfg: DcoConfig, overrides: &ConfigOverrides, size: u64) -> Result<()> {
    let rows = plan_rows(cfg, overrides, size)?;
    if rows.is_empty() {
        println!("Empty resource: nothing to dispatch.");
        return Ok(());
    }
    println!("{:<6} {:<12} {:<12} {:<6} {}", "ID", "START", "END", "BATCH", "ENDPOINT");
    for row in &rows {
        println!(
            "{:<6} {:<12} {:<12} {:<6} {}",
            row.chunk.id, row.chunk.start, row.chunk.end, row.batch, row.endpoint
        );
    }
    let batches = rows.last().map(|r| r.batch + 1).unwrap_or(0);
    println!("{} chunk(s) in {} batch(es)", rows.len(), batches);
    Ok(())
}
