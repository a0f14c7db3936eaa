//! ecsim-core - Embedded controller protocol emulation
//!
//! This crate models the I/O-port-visible behaviour of a laptop embedded
//! controller: the ACPI EC command/data port pair, the SuperIO index/data
//! pair, and the SPI flash follow mode used to reflash the EC in system.
//! It is designed to be `no_std` compatible; the [`Ec`] itself and the
//! low-level emulation bypass need `alloc`.
//!
//! # Features
//!
//! - `std` - Enable standard library support (includes `alloc` and `serde`)
//! - `alloc` - Enable the [`Ec`] aggregate and the bypass adapter
//! - `serde` - Derive `Deserialize`/`Serialize` for configuration types
//!
//! # Example
//!
//! ```
//! use ecsim_core::{Ec, EcConfig};
//!
//! let mut ec = Ec::new(&EcConfig::default());
//! ec.write(0x66, 0x92); // get project
//! assert_eq!(ec.read(0x62), b'N');
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod acpi;
pub mod config;
#[cfg(feature = "alloc")]
pub mod ec;
pub mod error;
pub mod lle;
pub mod readout;
pub mod spi;
pub mod state;
pub mod superio;

pub use config::{EcConfig, Port, PortMap};
#[cfg(feature = "alloc")]
pub use ec::{Ec, EcStatus};
pub use error::{Error, Result};
#[cfg(feature = "alloc")]
pub use lle::{BoxedTransport, Lle};
pub use lle::{LleRequest, Transport};
pub use state::{SpiState, State};
