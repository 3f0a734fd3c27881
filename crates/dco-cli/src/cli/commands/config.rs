//! `dco config` – show where the config lives and what it says.

use anyhow::Result;
use dco_core::config::{self, DcoConfig};

pub fn run_config(cfg: &DcoConfig) -> Result<()> {
    println!("# {}", config::config_path()?.display());
    print!("{}", toml_string(cfg)?);
    Ok(())
}

fn toml_string(cfg: &DcoConfig) -> Result<String> {
    // Show the transport section even when the file omits it.
    let mut effective = cfg.clone();
    effective.transport.get_or_insert_with(Default::default);
    Ok(toml::to_string_pretty(&effective)?)
}
