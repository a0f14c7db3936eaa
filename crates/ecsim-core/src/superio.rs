//! SuperIO indexed register file

/// 256 registers behind an index/data port pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperIo {
    address: u8,
    registers: [u8; 256],
}

/// Chip ID high byte register
pub const CHIP_ID_HIGH: u8 = 0x20;
/// Chip ID low byte register
pub const CHIP_ID_LOW: u8 = 0x21;

impl SuperIo {
    /// Create a register file reporting the given chip ID
    pub fn new(chip_id: u16) -> Self {
        let mut registers = [0; 256];
        registers[CHIP_ID_HIGH as usize] = (chip_id >> 8) as u8;
        registers[CHIP_ID_LOW as usize] = chip_id as u8;
        Self {
            address: 0,
            registers,
        }
    }

    /// Latched register index
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Latch a register index
    pub fn set_address(&mut self, address: u8) {
        self.address = address;
    }

    /// Read the selected register
    pub fn read_data(&self) -> u8 {
        self.registers[self.address as usize]
    }

    /// Write the selected register
    pub fn write_data(&mut self, value: u8) {
        self.registers[self.address as usize] = value;
    }

    /// Peek at any register without moving the index
    pub fn register(&self, index: u8) -> u8 {
        self.registers[index as usize]
    }

    /// Chip ID as currently visible in registers 0x20/0x21
    pub fn chip_id(&self) -> u16 {
        u16::from_be_bytes([
            self.register(CHIP_ID_HIGH),
            self.register(CHIP_ID_LOW),
        ])
    }
}
