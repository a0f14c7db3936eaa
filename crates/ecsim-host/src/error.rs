//! Error types for host-side operations

use thiserror::Error;

/// Host-side errors
#[derive(Debug, Error)]
pub enum HostError {
    /// Failed to reach the low-level emulation peer
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Endpoint string could not be parsed
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Configuration file could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration parsed but is inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ecsim_core::Error),

    /// Transaction script syntax error
    #[error("Script line {line}: {message}")]
    Script { line: usize, message: String },

    /// Read returned something other than the expected value
    #[error("Script line {line}: port 0x{port:02X} read 0x{actual:02X}, expected 0x{expected:02X}")]
    Mismatch {
        line: usize,
        port: u8,
        expected: u8,
        actual: u8,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for host operations
pub type Result<T> = std::result::Result<T, HostError>;
