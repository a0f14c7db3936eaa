//! ecsim-host - Host-side glue for the EC emulator
//!
//! This crate connects the `no_std` core to the outside world:
//!
//! - UDP / TCP transports to a low-level emulation (LLE) peer
//! - Connect-or-fallback construction of the [`Ec`](ecsim_core::Ec)
//! - TOML configuration files
//! - A peer server answering LLE requests from an internal EC model
//! - Port transaction scripts
//! - The process-wide EC used by trap handlers
//!
//! # Example
//!
//! ```no_run
//! use ecsim_host::{open_ec, HostConfig};
//!
//! // Connects to 127.0.0.1:8587 if a peer answers, otherwise emulates internally
//! let mut ec = open_ec(&HostConfig::default());
//! ec.write(0x66, 0x93);
//! let first = ec.read(0x62);
//! println!("version starts with {}", first as char);
//! ```

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod global;
pub mod peer;
pub mod script;
pub mod transport;

// Re-exports
pub use bootstrap::{open_ec, open_lle};
pub use config::{HostConfig, LleConfig, TransportKind, DEFAULT_LLE_ENDPOINT};
pub use error::{HostError, Result};
pub use global::{configure, global_read, global_shutdown, global_write};
pub use peer::Peer;
pub use script::Script;
pub use transport::{open_transport, TcpTransport, UdpTransport};
