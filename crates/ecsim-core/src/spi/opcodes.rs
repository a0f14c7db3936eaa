//! SPI flash opcodes and EC follow-mode control bytes
//!
//! Flash opcodes are the JEDEC ones understood by the flash behind the EC.
//! Control bytes are written to the EC command port and drive chip select
//! and the direction of the next byte.

// ============================================================================
// Write control
// ============================================================================

/// Write Enable - sets WEL in the status register
pub const WREN: u8 = 0x06;
/// Write Disable - clears WEL in the status register
pub const WRDI: u8 = 0x04;

// ============================================================================
// Status register operations
// ============================================================================

/// Read Status Register
pub const RDSR: u8 = 0x05;
/// Write Status Register
pub const WRSR: u8 = 0x01;

// ============================================================================
// Identification
// ============================================================================

/// Read JEDEC ID (manufacturer + device ID)
pub const RDID: u8 = 0x9F;

// ============================================================================
// Read / erase / program
// ============================================================================

/// Fast Read (with dummy byte)
pub const FAST_READ: u8 = 0x0B;
/// Sector Erase 4 KiB
pub const SE_20: u8 = 0x20;
/// Sector Erase (ITE EC flash variant)
pub const SE_D7: u8 = 0xD7;
/// Auto Address Increment word program (SST)
pub const AAI_WP: u8 = 0xAD;

// ============================================================================
// Status register bits
// ============================================================================

/// Write In Progress
pub const SR_WIP: u8 = 0x01;
/// Write Enable Latch
pub const SR_WEL: u8 = 0x02;
/// Block Protect bit 0
pub const SR_BP0: u8 = 0x04;
/// Block Protect bit 1
pub const SR_BP1: u8 = 0x08;
/// Block Protect bit 2
pub const SR_BP2: u8 = 0x10;

// ============================================================================
// Follow-mode control bytes (EC command port)
// ============================================================================

/// Enter follow mode / deassert chip select
pub const CTL_FOLLOW: u8 = 0x01;
/// Assert chip select; next data byte is a flash opcode
pub const CTL_COMMAND: u8 = 0x02;
/// Next data byte goes out to the flash
pub const CTL_WRITE: u8 = 0x03;
/// Clock one byte in from the flash
pub const CTL_READ: u8 = 0x04;
/// Leave follow mode
pub const CTL_UNFOLLOW: u8 = 0x05;
