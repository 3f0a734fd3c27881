//! Structured logging for `dco`.
//!
//! Chunk dispatch, failures and run totals are tracing events. They go to
//! `~/.local/state/dco/dco.log`; the CLI falls back to stderr when that file
//! cannot be opened. `RUST_LOG` overrides the default filter.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,dco=debug,dco_core=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Path of the log file: `~/.local/state/dco/dco.log`.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dco")?;
    Ok(xdg_dirs.get_state_home().join("dco").join("dco.log"))
}

/// Open `path` for appending, creating its directory first. Runs append to
/// one file across invocations.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

/// Install the file subscriber and return the log path.
///
/// Errors when the state dir is unwritable or a subscriber is already
/// installed; the caller then uses `init_logging_stderr`.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = open_log_file(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install log subscriber: {}", e))?;

    tracing::info!(path = %path.display(), "dco logging initialized");
    Ok(path)
}

/// Stderr-only subscriber. Never fails; a second install is ignored.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn log_file_created_with_parent_dirs_and_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("dco").join("dco.log");

        let mut first = open_log_file(&path).unwrap();
        writeln!(first, "run 1").unwrap();
        drop(first);
        let mut second = open_log_file(&path).unwrap();
        writeln!(second, "run 2").unwrap();
        drop(second);

        assert_eq!(fs::read_to_string(&path).unwrap(), "run 1\nrun 2\n");
    }

    #[test]
    fn log_path_ends_in_dco_log() {
        if let Ok(path) = log_file_path() {
            assert!(path.ends_with("dco/dco.log"));
        }
    }
}
