//! ecsim - Embedded controller port-level emulator
//!
//! Drives the EC model from the command line:
//!
//! - `replay` runs a port transaction script and prints every read
//! - `serve` answers low-level emulation requests from another instance
//! - `info` reads back the identification strings through the ports
//!
//! Every command reads an optional TOML configuration (`--config`); without
//! one the stock EC is emulated and a peer on 127.0.0.1:8587 is tried first.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use ecsim_host::HostConfig;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logger; RUST_LOG still overrides the verbosity flags
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Replay { script, no_lle } => {
            commands::replay::cmd_replay(&with_lle(config, no_lle), &script)
        }
        Commands::Serve { listen, tcp } => commands::serve::cmd_serve(&config, &listen, tcp),
        Commands::Info { no_lle } => commands::info::cmd_info(&with_lle(config, no_lle)),
    }
}

/// Load the configuration file, or the defaults when none is given
fn load_config(path: Option<&Path>) -> Result<HostConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(HostConfig::load(path)?),
        None => Ok(HostConfig::default()),
    }
}

fn with_lle(mut config: HostConfig, no_lle: bool) -> HostConfig {
    if no_lle {
        config.lle.enabled = false;
    }
    config
}
