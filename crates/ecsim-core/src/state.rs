//! Protocol state of the EC command interface
//!
//! The EC has a single state register. The outer layer covers the ACPI and
//! identification commands; while the host is talking to the flash through
//! the EC, the outer state is [`State::Spi`] and the nested [`SpiState`]
//! tracks the flash command layer.

/// Top-level protocol state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Waiting for a command
    #[default]
    Idle,
    /// Next data write is an ACPI index to read
    GetAcpi,
    /// Next data write is an ACPI index to write
    SetAcpi,
    /// Next data write is the value for the captured ACPI index
    SetAcpiIndex(u8),
    /// Data reads stream the project identifier
    GetProject,
    /// Data reads stream the version identifier
    GetVersion,
    /// Inside the SPI follow-mode sub-protocol
    Spi(SpiState),
}

impl State {
    /// Returns the nested SPI state, if any
    pub const fn spi(&self) -> Option<SpiState> {
        match self {
            Self::Spi(spi) => Some(*spi),
            _ => None,
        }
    }
}

/// SPI follow-mode sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiState {
    /// Waiting for the next control byte
    Follow,
    /// Next data write is a flash opcode
    Command,
    /// Status register read selected
    ReadStatus,
    /// JEDEC ID read selected
    ReadJedec,
    /// Status register write selected
    WriteStatus,
    /// Next data write is the new status register value
    WriteStatusData,
    /// Sector erase selected
    SectorErase,
    /// Collecting the sector erase address
    SectorEraseAddress,
    /// High-speed read selected
    HsRead,
    /// Collecting the high-speed read address and dummy byte
    HsReadAddress,
    /// High-speed read data phase
    HsReadData,
    /// Auto-address-increment program selected (data phase not implemented)
    AaiProgram,
}

impl SpiState {
    /// States in which data-port writes are flash payload
    pub const fn takes_payload(&self) -> bool {
        matches!(
            self,
            Self::Command
                | Self::WriteStatusData
                | Self::SectorEraseAddress
                | Self::HsReadAddress
                | Self::AaiProgram
        )
    }
}
