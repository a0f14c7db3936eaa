//! Flash chip behind the EC's follow mode
//!
//! The EC relays the host's flash traffic one byte at a time. Control bytes
//! on the command port move the chip-select / direction machinery, data-port
//! writes carry opcodes, addresses and register values. Array contents are
//! not modelled: erases only log their address and reads return 0xFF.

use bitflags::bitflags;

use super::address::AddressLatch;
use super::opcodes::*;
use crate::state::SpiState;

bitflags! {
    /// Flash status register
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SpiStatus: u8 {
        /// Write in progress
        const WIP = SR_WIP;
        /// Write enable latch
        const WEL = SR_WEL;
        /// Block protect 0
        const BP0 = SR_BP0;
        /// Block protect 1
        const BP1 = SR_BP1;
        /// Block protect 2
        const BP2 = SR_BP2;
    }
}

/// Byte returned for every high-speed read data clock
pub const READ_FILLER: u8 = 0xFF;

/// Result of feeding one control byte to the flash layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Next SPI state; `None` leaves follow mode
    pub next: Option<SpiState>,
    /// Byte to stage in the EC data register
    pub response: Option<u8>,
}

impl Step {
    fn to(next: SpiState) -> Self {
        Self {
            next: Some(next),
            response: None,
        }
    }

    fn respond(next: SpiState, byte: u8) -> Self {
        Self {
            next: Some(next),
            response: Some(byte),
        }
    }
}

/// Emulated SPI NOR flash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpiFlash {
    status: SpiStatus,
    latch: AddressLatch,
    last_address: Option<u32>,
    jedec_id: [u8; 4],
    jedec_cursor: usize,
}

impl SpiFlash {
    /// Create a flash with the given status register and JEDEC ID
    pub fn new(status: u8, jedec_id: [u8; 4]) -> Self {
        Self {
            status: SpiStatus::from_bits_retain(status),
            latch: AddressLatch::default(),
            last_address: None,
            jedec_id,
            jedec_cursor: 0,
        }
    }

    /// Status register
    pub fn status(&self) -> SpiStatus {
        self.status
    }

    /// Address latch
    pub fn latch(&self) -> &AddressLatch {
        &self.latch
    }

    /// Last fully received erase or read address
    pub fn last_address(&self) -> Option<u32> {
        self.last_address
    }

    /// Number of JEDEC ID bytes already returned
    pub fn jedec_cursor(&self) -> usize {
        self.jedec_cursor
    }

    /// Handle a control byte written to the command port in follow mode
    pub fn control(&mut self, state: SpiState, byte: u8) -> Step {
        match byte {
            CTL_FOLLOW => {
                log::trace!("spi follow");
                Step::to(SpiState::Follow)
            }
            CTL_COMMAND => {
                log::trace!("spi command");
                Step::to(SpiState::Command)
            }
            CTL_WRITE => Step::to(self.write_phase(state)),
            CTL_READ => self.read_phase(state),
            CTL_UNFOLLOW => {
                log::trace!("spi unfollow");
                Step {
                    next: None,
                    response: None,
                }
            }
            _ => {
                log::debug!("spi control 0x{:02X} unsupported in {:?}", byte, state);
                Step::to(state)
            }
        }
    }

    fn write_phase(&mut self, state: SpiState) -> SpiState {
        match state {
            SpiState::WriteStatus => SpiState::WriteStatusData,
            SpiState::SectorErase => {
                self.latch.reset();
                SpiState::SectorEraseAddress
            }
            SpiState::HsRead => {
                self.latch.reset();
                SpiState::HsReadAddress
            }
            _ => {
                log::debug!("spi write phase unsupported in {:?}", state);
                state
            }
        }
    }

    fn read_phase(&mut self, state: SpiState) -> Step {
        match state {
            SpiState::ReadStatus => {
                log::trace!("spi read status 0x{:02X}", self.status.bits());
                Step::respond(state, self.status.bits())
            }
            SpiState::ReadJedec => match self.jedec_id.get(self.jedec_cursor) {
                Some(&byte) => {
                    self.jedec_cursor += 1;
                    log::trace!("spi read jedec 0x{:02X}", byte);
                    Step::respond(state, byte)
                }
                None => Step::to(state),
            },
            SpiState::HsReadData => {
                log::trace!(
                    "spi high speed read 0x{:08X}",
                    self.last_address.unwrap_or(0)
                );
                Step::respond(state, READ_FILLER)
            }
            _ => {
                log::debug!("spi read phase unsupported in {:?}", state);
                Step::to(state)
            }
        }
    }

    /// Handle a data-port write while in follow mode; returns the next state
    pub fn payload(&mut self, state: SpiState, byte: u8) -> SpiState {
        match state {
            SpiState::Command => self.opcode(byte),
            SpiState::WriteStatusData => {
                // Every bit is writable, including the ones real parts keep read-only
                self.status = SpiStatus::from_bits_retain(byte);
                log::debug!("spi write status 0x{:02X}", byte);
                SpiState::WriteStatus
            }
            SpiState::SectorEraseAddress => match self.latch.push(byte) {
                Some(address) => {
                    self.last_address = Some(address);
                    log::debug!("spi sector erase 0x{:08X}", address);
                    SpiState::Follow
                }
                None => state,
            },
            SpiState::HsReadAddress => {
                if self.latch.is_complete() {
                    log::trace!("spi high speed read dummy");
                    SpiState::HsReadData
                } else {
                    if let Some(address) = self.latch.push(byte) {
                        self.last_address = Some(address);
                        log::debug!("spi high speed read 0x{:08X}", address);
                    }
                    state
                }
            }
            SpiState::AaiProgram => {
                log::debug!("spi aai program data 0x{:02X} ignored", byte);
                state
            }
            _ => {
                log::debug!("spi data 0x{:02X} unsupported in {:?}", byte, state);
                state
            }
        }
    }

    fn opcode(&mut self, opcode: u8) -> SpiState {
        match opcode {
            WRSR => {
                log::trace!("spi opcode write status");
                SpiState::WriteStatus
            }
            WRDI => {
                self.status.remove(SpiStatus::WEL);
                log::trace!("spi opcode write disable");
                SpiState::Follow
            }
            RDSR => {
                log::trace!("spi opcode read status");
                SpiState::ReadStatus
            }
            WREN => {
                self.status.insert(SpiStatus::WEL);
                log::trace!("spi opcode write enable");
                SpiState::Follow
            }
            FAST_READ => {
                self.latch.reset();
                log::trace!("spi opcode high speed read");
                SpiState::HsRead
            }
            SE_20 | SE_D7 => {
                self.latch.reset();
                log::trace!("spi opcode sector erase");
                SpiState::SectorErase
            }
            RDID => {
                self.jedec_cursor = 0;
                log::trace!("spi opcode read jedec");
                SpiState::ReadJedec
            }
            AAI_WP => {
                log::trace!("spi opcode aai program");
                SpiState::AaiProgram
            }
            _ => {
                log::debug!("spi opcode 0x{:02X} unsupported", opcode);
                SpiState::Command
            }
        }
    }
}
