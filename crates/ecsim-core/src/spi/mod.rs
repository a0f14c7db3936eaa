//! SPI flash emulation behind the EC follow mode
//!
//! This module provides the flash command layer the host reaches by writing
//! control byte 0x01 to the EC command port.

mod address;
mod flash;
pub mod opcodes;

pub use address::AddressLatch;
pub use flash::{SpiFlash, SpiStatus, Step, READ_FILLER};
