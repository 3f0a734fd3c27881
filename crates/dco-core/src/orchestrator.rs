//! One run end to end: size snapshot, plan, batched dispatch, report.

use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

use crate::config::RunConfig;
use crate::dispatch::{BatchDispatcher, RunProgress};
use crate::error::ConfigError;
use crate::planner::plan_chunks;
use crate::probe::{self, SizeSource};
use crate::report::RunReport;
use crate::worker::{ChunkWorker, CurlWorker};

pub struct Orchestrator {
    config: RunConfig,
    worker: Arc<dyn ChunkWorker>,
    progress_tx: Option<mpsc::Sender<RunProgress>>,
}

impl Orchestrator {
    pub fn new(config: RunConfig, worker: Arc<dyn ChunkWorker>) -> Self {
        Self {
            config,
            worker,
            progress_tx: None,
        }
    }

    /// Orchestrator calling workers over HTTP with the configured transport.
    pub fn with_curl(config: RunConfig) -> Self {
        let worker = Arc::new(CurlWorker::new(config.transport));
        Self::new(config, worker)
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<RunProgress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Resolve the size of `file_name`, then run it.
    ///
    /// Errors only for bad configuration or when the size cannot be found;
    /// chunk failures are reported inside the `RunReport`.
    pub async fn process_file(&self, file_name: &str, size: &SizeSource) -> Result<RunReport> {
        if file_name.trim().is_empty() {
            return Err(ConfigError::EmptyResourceName.into());
        }
        let resource_size = probe::resolve_size(size, self.config.transport).await?;
        self.process_with_size(file_name, resource_size).await
    }

    /// Run against a size snapshot taken by the caller. The plan is never
    /// revised, even if the resource changes size mid-run.
    pub async fn process_with_size(
        &self,
        file_name: &str,
        resource_size: u64,
    ) -> Result<RunReport> {
        if file_name.trim().is_empty() {
            return Err(ConfigError::EmptyResourceName.into());
        }
        let started = Instant::now();
        let ring = self.config.endpoint_ring()?;
        let chunks = plan_chunks(resource_size, self.config.chunk_size);
        tracing::info!(
            file_name,
            resource_size,
            chunks = chunks.len(),
            batch_size = self.config.batch_size,
            endpoints = ring.len(),
            "starting run"
        );

        let mut dispatcher = BatchDispatcher::new(file_name, ring, Arc::clone(&self.worker));
        if let Some(tx) = &self.progress_tx {
            dispatcher = dispatcher.with_progress(tx.clone());
        }
        let dispatched = dispatcher.run(&chunks, self.config.batch_size).await;

        let report = RunReport {
            file_name: file_name.to_string(),
            resource_size,
            chunk_size: self.config.chunk_size,
            batch_size: self.config.batch_size,
            outcomes: dispatched.reports,
            totals: dispatched.totals,
            elapsed_secs: started.elapsed().as_secs_f64(),
        };
        if report.is_degraded() {
            tracing::warn!(
                failed = report.failed_count(),
                chunks = report.outcomes.len(),
                "run finished with failed chunks; totals undercount"
            );
        }
        Ok(report)
    }
}
