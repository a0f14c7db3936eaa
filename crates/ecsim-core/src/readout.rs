//! Identifier readout (commands 0x92 / 0x93)

/// Byte returned once the identifier is exhausted
pub const TERMINATOR: u8 = b'$';

/// An identifier streamed one byte per data-port read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readout {
    bytes: heapless::Vec<u8, 16>,
    cursor: usize,
}

impl Readout {
    /// Create a readout for an identifier of at most 16 bytes
    pub fn new(ident: &str) -> Self {
        let mut bytes = heapless::Vec::new();
        for &byte in ident.as_bytes().iter().take_while(|&&b| b != 0) {
            if bytes.push(byte).is_err() {
                break;
            }
        }
        Self { bytes, cursor: 0 }
    }

    /// Restart from the first byte
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Next byte, or `None` at the end; the cursor never passes the end
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.bytes.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(byte)
    }

    /// Current position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Identifier bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
