//! Flash address latch

/// Collects a 4-byte flash address one data write at a time
///
/// The host sends the least significant byte first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AddressLatch {
    bytes: [u8; 4],
    received: u8,
}

impl AddressLatch {
    /// Bytes in a full address
    pub const WIDTH: u8 = 4;

    /// Clear the latch and wait for a new address
    pub fn reset(&mut self) {
        self.bytes = [0; 4];
        self.received = 0;
    }

    /// Feed one byte; returns the address once the fourth byte arrives
    ///
    /// Bytes pushed after completion are ignored.
    pub fn push(&mut self, byte: u8) -> Option<u32> {
        if self.is_complete() {
            return None;
        }
        self.bytes[self.received as usize] = byte;
        self.received += 1;
        if self.is_complete() {
            Some(self.address())
        } else {
            None
        }
    }

    /// Whether all four bytes have been received
    pub const fn is_complete(&self) -> bool {
        self.received == Self::WIDTH
    }

    /// Down-counter within `0..=3`
    ///
    /// Starts at 3, stays there for the first byte, and reaches 0 exactly
    /// when the fourth byte completes the address.
    pub const fn remaining(&self) -> u8 {
        let left = Self::WIDTH - self.received;
        if left > Self::WIDTH - 1 {
            Self::WIDTH - 1
        } else {
            left
        }
    }

    /// Address assembled from the bytes received so far
    pub const fn address(&self) -> u32 {
        u32::from_le_bytes(self.bytes)
    }
}
