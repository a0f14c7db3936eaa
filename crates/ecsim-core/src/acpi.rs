//! ACPI shadow memory and the command record at 0xF8
//!
//! The host reaches this space through EC commands 0x80 (read) and 0x81
//! (write). A write to [`CMD_RECORD`] makes the EC interpret the six bytes
//! at `0xF8..=0xFD` as `{cmd, d1, d2, d3, d4, d5}` and write them back.

/// Power source flags (AC adapter, battery presence)
pub const POWER_FLAGS: u8 = 0x10;
/// AC adapter present
pub const POWER_ADP: u8 = 1 << 0;
/// Battery 0 present
pub const POWER_BAT0: u8 = 1 << 2;
/// Flash region size, in KiB
pub const REGION_SIZE: u8 = 0xE5;
/// First byte of the command record
pub const CMD_RECORD: u8 = 0xF8;

/// Record command: read an EC-internal address
pub const RECORD_READ_ADDRESS: u8 = 0xB1;

/// Six-byte command record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandRecord {
    /// Command byte
    pub cmd: u8,
    /// Parameters / results
    pub data: [u8; 5],
}

impl CommandRecord {
    /// Run the record, updating its result bytes in place
    pub fn execute(&mut self) {
        log::debug!(
            "acpi command 0x{:02X}, 0x{:02X}, 0x{:02X}, 0x{:02X}, 0x{:02X}, 0x{:02X}",
            self.cmd,
            self.data[0],
            self.data[1],
            self.data[2],
            self.data[3],
            self.data[4]
        );

        if self.cmd != RECORD_READ_ADDRESS {
            return;
        }

        // d3 qualifies the access; only 0 (read) is known
        if self.data[2] != 0 {
            log::debug!("acpi read address unsupported 0x{:02X}", self.data[2]);
            return;
        }

        let address = u16::from_be_bytes([self.data[0], self.data[1]]);
        self.data[0] = read_internal(address);
        log::debug!("acpi read address 0x{:04X} = 0x{:02X}", address, self.data[0]);
    }
}

/// The only EC-internal location the firmware answers with a non-zero value
fn read_internal(address: u16) -> u8 {
    match address {
        0x2002 => 0x06,
        _ => 0x00,
    }
}

/// 256-byte ACPI shadow memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcpiSpace {
    bytes: [u8; 256],
}

impl Default for AcpiSpace {
    fn default() -> Self {
        let mut bytes = [0; 256];
        bytes[POWER_FLAGS as usize] = POWER_ADP | POWER_BAT0;
        // 128 KiB
        bytes[REGION_SIZE as usize] = 0x80;
        Self { bytes }
    }
}

impl AcpiSpace {
    /// Read one byte
    pub fn get(&self, index: u8) -> u8 {
        self.bytes[index as usize]
    }

    /// Write one byte, running the command record when `index` is 0xF8
    pub fn set(&mut self, index: u8, value: u8) {
        self.bytes[index as usize] = value;
        if index == CMD_RECORD {
            let mut record = self.record();
            record.execute();
            self.store_record(&record);
        }
    }

    /// Current contents of the command record
    pub fn record(&self) -> CommandRecord {
        let base = CMD_RECORD as usize;
        let mut data = [0; 5];
        data.copy_from_slice(&self.bytes[base + 1..base + 6]);
        CommandRecord {
            cmd: self.bytes[base],
            data,
        }
    }

    fn store_record(&mut self, record: &CommandRecord) {
        let base = CMD_RECORD as usize + 1;
        self.bytes[base..base + 5].copy_from_slice(&record.data);
    }

    /// Whole space, for inspection
    pub fn as_bytes(&self) -> &[u8; 256] {
        &self.bytes
    }
}
