//! TOML configuration files
//!
//! ```toml
//! [ec]
//! project = "N130ZU"
//! version = "07.02"
//! superio_id = 0x8587
//! jedec_id = [0xFF, 0xFF, 0xFE, 0xFF]
//!
//! [ec.ports]
//! data = 0x62
//! command = 0x66
//!
//! [lle]
//! enabled = true
//! endpoint = "127.0.0.1:8587"
//! transport = "udp"
//! ```
//!
//! Every key is optional.

use std::fs;
use std::path::Path;

use ecsim_core::EcConfig;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default low-level emulation endpoint
pub const DEFAULT_LLE_ENDPOINT: &str = "127.0.0.1:8587";

/// Byte channel used to reach the peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// One datagram per request and response
    #[default]
    Udp,
    /// Stream socket
    Tcp,
}

/// Low-level emulation peer settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LleConfig {
    /// Try to connect at all
    pub enabled: bool,
    /// `host:port` of the peer
    pub endpoint: String,
    /// Channel type
    pub transport: TransportKind,
    /// Round-trip timeout in milliseconds; none blocks indefinitely
    pub timeout_ms: Option<u64>,
}

impl Default for LleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_LLE_ENDPOINT.to_string(),
            transport: TransportKind::Udp,
            timeout_ms: None,
        }
    }
}

/// Complete host configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HostConfig {
    /// EC power-on state
    pub ec: EcConfig,
    /// Peer settings
    pub lle: LleConfig,
}

impl HostConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: HostConfig = toml::from_str(text)?;
        config.ec.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Configuration with the peer disabled
    pub fn high_level() -> Self {
        Self {
            lle: LleConfig {
                enabled: false,
                ..LleConfig::default()
            },
            ..Self::default()
        }
    }
}
