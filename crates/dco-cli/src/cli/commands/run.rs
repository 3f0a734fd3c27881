//! `dco run` – process one resource across the configured workers.

use anyhow::Result;
use dco_core::config::{ConfigOverrides, DcoConfig};
use dco_core::dispatch::RunProgress;
use dco_core::orchestrator::Orchestrator;
use dco_core::probe::SizeSource;
use std::path::Path;
use std::time::Instant;

const PROGRESS_INTERVAL_MS: u64 = 500;

pub async fn run_orchestrator(
    mut cfg: DcoConfig,
    overrides: &ConfigOverrides,
    file_name: &str,
    size: Option<u64>,
    output: Option<&Path>,
) -> Result<()> {
    cfg.apply(overrides);
    let run_config = cfg.to_run_config()?;
    let source = SizeSource::choose(size, run_config.storage_url.as_ref(), file_name)?;

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<RunProgress>(64);
    let progress_handle = tokio::spawn(async move {
        let mut last_print = Instant::now();
        while let Some(p) = progress_rx.recv().await {
            let now = Instant::now();
            let due = now.duration_since(last_print).as_millis() as u64 >= PROGRESS_INTERVAL_MS;
            if due || p.is_done() {
                let eta = p
                    .eta_secs()
                    .map(|s| format!("{:.0}s", s))
                    .unwrap_or_else(|| "?".to_string());
                eprintln!(
                    "  {} / {} chunks ({:.1}%)  {} failed  {} verbs  ETA {}",
                    p.chunks_settled,
                    p.chunk_count,
                    p.fraction() * 100.0,
                    p.chunks_failed,
                    p.totals.total,
                    eta
                );
                last_print = now;
            }
        }
    });

    let orchestrator = Orchestrator::with_curl(run_config).with_progress(progress_tx);
    let result = orchestrator.process_file(file_name, &source).await;
    drop(orchestrator);
    let _ = progress_handle.await;
    let report = result?;

    println!("{}", report);
    if report.is_degraded() {
        eprintln!(
            "warning: {} of {} chunk(s) failed; totals cover successful chunks only",
            report.failed_count(),
            report.outcomes.len()
        );
    }
    if let Some(path) = output {
        report.write_json(path)?;
        tracing::info!("wrote run report to {}", path.display());
    }
    Ok(())
}
