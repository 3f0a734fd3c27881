//! Run report: the one thing a caller gets back from a run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::aggregate::AggregateState;
use crate::endpoint::Endpoint;
use crate::outcome::ChunkReport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub file_name: String,
    /// Size snapshot the plan was built from.
    pub resource_size: u64,
    pub chunk_size: u64,
    pub batch_size: usize,
    /// One entry per planned chunk, in plan order.
    pub outcomes: Vec<ChunkReport>,
    pub totals: AggregateState,
    pub elapsed_secs: f64,
}

impl RunReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &ChunkReport> {
        self.outcomes.iter().filter(|r| r.outcome.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ChunkReport> {
        self.outcomes.iter().filter(|r| !r.outcome.is_success())
    }

    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    /// True when at least one chunk failed; totals then undercount.
    pub fn is_degraded(&self) -> bool {
        self.failed().next().is_some()
    }

    /// Chunks sent to each endpoint. Round-robin starts at the first endpoint,
    /// so first-use order is configuration order.
    pub fn endpoint_load(&self) -> Vec<(Endpoint, usize)> {
        let mut load: Vec<(Endpoint, usize)> = Vec::new();
        for r in &self.outcomes {
            match load.iter_mut().find(|(e, _)| *e == r.endpoint) {
                Some((_, n)) => *n += 1,
                None => load.push((r.endpoint.clone(), 1)),
            }
        }
        load
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize run report")
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json).with_context(|| format!("write report {}", path.display()))
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total verbs processed: {}", self.totals.total)?;
        writeln!(f, "Verb breakdown:")?;
        for (category, count) in self.totals.per_category.iter() {
            let name = category.as_str();
            let mut chars = name.chars();
            let title: String = match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            };
            writeln!(f, "  {} verbs: {}", title, count)?;
        }
        write!(
            f,
            "Chunks: {} ok, {} failed, {} total ({:.1}s)",
            self.outcomes.len() - self.failed_count(),
            self.failed_count(),
            self.outcomes.len(),
            self.elapsed_secs
        )
    }
}
