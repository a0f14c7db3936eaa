//! EC configuration
//!
//! Everything here has a default matching the stock N130ZU firmware, so an
//! empty configuration file yields the usual EC.

use crate::error::{Error, Result};

/// Identifier strings are stored in 16-byte slots.
pub type Ident = heapless::String<16>;

/// I/O ports the EC answers on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PortMap {
    /// SuperIO index (address) port
    pub superio_address: u8,
    /// SuperIO data port
    pub superio_data: u8,
    /// EC data port
    pub data: u8,
    /// EC command / status port
    pub command: u8,
}

impl Default for PortMap {
    fn default() -> Self {
        Self {
            superio_address: 0x2E,
            superio_data: 0x2F,
            data: 0x62,
            command: 0x66,
        }
    }
}

/// EC function behind an I/O port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    /// SuperIO index port
    SuperIoAddress,
    /// SuperIO data port
    SuperIoData,
    /// EC data port
    Data,
    /// EC command / status port
    Command,
}

impl PortMap {
    /// Map an I/O port to the EC function behind it
    pub fn decode(&self, port: u8) -> Option<Port> {
        if port == self.superio_address {
            Some(Port::SuperIoAddress)
        } else if port == self.superio_data {
            Some(Port::SuperIoData)
        } else if port == self.data {
            Some(Port::Data)
        } else if port == self.command {
            Some(Port::Command)
        } else {
            None
        }
    }

    /// Check that every function has its own port
    pub fn validate(&self) -> Result<()> {
        let ports = [
            self.superio_address,
            self.superio_data,
            self.data,
            self.command,
        ];
        for (i, port) in ports.iter().enumerate() {
            if ports[i + 1..].contains(port) {
                return Err(Error::PortConflict(*port));
            }
        }
        Ok(())
    }
}

/// Power-on state of the emulated EC
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EcConfig {
    /// Port assignment
    pub ports: PortMap,
    /// Model identifier returned by command 0x92
    pub project: Ident,
    /// Firmware version returned by command 0x93
    pub version: Ident,
    /// Chip ID exposed in SuperIO registers 0x20 (high) and 0x21 (low)
    pub superio_id: u16,
    /// Initial flash status register
    pub spi_status: u8,
    /// Bytes returned by the flash JEDEC ID command
    pub jedec_id: [u8; 4],
}

impl Default for EcConfig {
    fn default() -> Self {
        Self {
            ports: PortMap::default(),
            project: Ident::try_from("N130ZU").unwrap_or_default(),
            version: Ident::try_from("07.02").unwrap_or_default(),
            superio_id: 0x8587,
            spi_status: 0x1C,
            jedec_id: [0xFF, 0xFF, 0xFE, 0xFF],
        }
    }
}

impl EcConfig {
    /// Replace the project identifier
    pub fn with_project(mut self, project: &str) -> Result<Self> {
        self.project = Ident::try_from(project).map_err(|_| Error::StringTooLong)?;
        Ok(self)
    }

    /// Replace the version identifier
    pub fn with_version(mut self, version: &str) -> Result<Self> {
        self.version = Ident::try_from(version).map_err(|_| Error::StringTooLong)?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.ports.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EcConfig::default();
        assert_eq!(config.project.as_str(), "N130ZU");
        assert_eq!(config.version.as_str(), "07.02");
        assert_eq!(config.ports.command, 0x66);
        assert_eq!(config.ports.data, 0x62);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_decode() {
        let ports = PortMap::default();
        assert_eq!(ports.decode(0x2E), Some(Port::SuperIoAddress));
        assert_eq!(ports.decode(0x2F), Some(Port::SuperIoData));
        assert_eq!(ports.decode(0x62), Some(Port::Data));
        assert_eq!(ports.decode(0x66), Some(Port::Command));
        assert_eq!(ports.decode(0x60), None);
    }

    #[test]
    fn test_port_conflict() {
        let mut config = EcConfig::default();
        config.ports.data = config.ports.command;
        assert_eq!(config.validate(), Err(Error::PortConflict(0x66)));
    }

    #[test]
    fn test_project_too_long() {
        let result = EcConfig::default().with_project("THIS-NAME-IS-TOO-LONG");
        assert_eq!(result.err(), Some(Error::StringTooLong));

        let config = EcConfig::default().with_project("N150CU").unwrap();
        assert_eq!(config.project.as_str(), "N150CU");
    }
}
