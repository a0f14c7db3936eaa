//! Error types for ecsim-core
//!
//! Port-level protocol mistakes are never errors: the EC ignores them the
//! same way the firmware does. Errors only come out of the bypass transport
//! and configuration validation.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Bypass transport errors
    /// Request was not sent in full
    ShortSend {
        /// Bytes actually sent
        sent: usize,
    },
    /// Response was shorter than one byte
    ShortReceive,
    /// Transport reported an I/O failure
    TransportFailed,
    /// Transport is closed
    Disconnected,

    // Configuration errors
    /// Identifier string does not fit its 16-byte slot
    StringTooLong,
    /// Two EC functions were assigned the same I/O port
    PortConflict(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortSend { sent } => write!(f, "short send: {} of 3 bytes", sent),
            Self::ShortReceive => write!(f, "short receive: no response byte"),
            Self::TransportFailed => write!(f, "transport I/O failure"),
            Self::Disconnected => write!(f, "transport disconnected"),
            Self::StringTooLong => write!(f, "identifier longer than 16 bytes"),
            Self::PortConflict(port) => write!(f, "I/O port 0x{:02X} assigned twice", port),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
