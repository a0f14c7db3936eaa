//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ecsim")]
#[command(author, version, about = "Embedded controller port-level emulator", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (TOML format)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log filter for the requested verbosity
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a port transaction script against the EC
    Replay {
        /// Script file (`r PORT [= VALUE]` / `w PORT VALUE` per line)
        script: PathBuf,

        /// Emulate internally even if a low-level peer is configured
        #[arg(long)]
        no_lle: bool,
    },

    /// Answer low-level emulation requests from an internal EC model
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = ecsim_host::DEFAULT_LLE_ENDPOINT)]
        listen: String,

        /// Accept TCP connections instead of UDP datagrams
        #[arg(long)]
        tcp: bool,
    },

    /// Show project, version and SuperIO chip ID as the EC reports them
    Info {
        /// Emulate internally even if a low-level peer is configured
        #[arg(long)]
        no_lle: bool,
    },
}
