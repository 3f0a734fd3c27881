//! CLI for the DCO chunk orchestrator.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dco_core::config::{self, ConfigOverrides};
use std::path::PathBuf;

use commands::{run_completions, run_config, run_orchestrator, run_plan};

/// Top-level CLI for the DCO chunk orchestrator.
#[derive(Debug, Parser)]
#[command(name = "dco")]
#[command(about = "DCO: fan one large resource out to worker endpoints", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Dispatch settings that override config.toml for one invocation.
#[derive(Debug, Clone, Default, Args)]
pub struct DispatchArgs {
    /// Worker endpoint URL; repeat for several (used round-robin in order).
    #[arg(long = "endpoint", value_name = "URL")]
    pub endpoints: Vec<String>,
    /// Bytes per chunk.
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<u64>,
    /// Maximum chunks in flight at once.
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,
}

impl DispatchArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            endpoints: self.endpoints.clone(),
            chunk_size: self.chunk_size,
            batch_size: self.batch_size,
            ..Default::default()
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Process one resource: probe its size, dispatch all chunks, print totals.
    Run {
        /// Resource (blob) name sent to every worker.
        file_name: String,
        #[command(flatten)]
        dispatch: DispatchArgs,
        /// Resource size in bytes; skips the HEAD probe.
        #[arg(long, value_name = "BYTES")]
        size: Option<u64>,
        /// Base URL of the blob container used for the size probe.
        #[arg(long, value_name = "URL")]
        storage_url: Option<String>,
        /// Write the full JSON run report to this path.
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
        /// Skip TLS certificate verification.
        #[arg(long)]
        insecure: bool,
    },

    /// Show the chunk plan and endpoint assignment for a size, without sending anything.
    Plan {
        /// Resource size in bytes.
        size: u64,
        #[command(flatten)]
        dispatch: DispatchArgs,
    },

    /// Show the config file path and effective values.
    Config,

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        if let CliCommand::Completions { shell } = cli.command {
            return run_completions(shell);
        }
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                file_name,
                dispatch,
                size,
                storage_url,
                output,
                insecure,
            } => {
                let overrides = ConfigOverrides {
                    storage_url,
                    insecure,
                    ..dispatch.overrides()
                };
                run_orchestrator(cfg, &overrides, &file_name, size, output.as_deref()).await?
            }
            CliCommand::Plan { size, dispatch } => run_plan(cfg, &dispatch.overrides(), size)?,
            CliCommand::Config => run_config(&cfg)?,
            CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
