//! Bypass to a low-level emulation (LLE) peer
//!
//! When a peer is connected every port access is forwarded as a 3-byte
//! request `{kind, port, value}` and the 1-byte answer is authoritative.
//! The first transport failure drops the peer for good and the EC falls back
//! to its internal model.

#[cfg(feature = "alloc")]
use alloc::boxed::Box;

use crate::error::Result;

/// Request kind, first byte on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LleRequest {
    /// Liveness check sent once after connecting
    Init = 0x00,
    /// Port read
    Read = 0x01,
    /// Port write
    Write = 0x02,
}

impl LleRequest {
    /// Decode a wire byte
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Init),
            0x01 => Some(Self::Read),
            0x02 => Some(Self::Write),
            _ => None,
        }
    }

    /// Encode a request
    pub const fn encode(self, address: u8, value: u8) -> [u8; 3] {
        [self as u8, address, value]
    }
}

/// Byte channel to the peer
pub trait Transport {
    /// Send one request; all three bytes must go out
    fn send(&mut self, request: &[u8; 3]) -> Result<()>;

    /// Receive exactly one response byte
    fn recv(&mut self, response: &mut [u8; 1]) -> Result<()>;
}

/// Boxed transport
#[cfg(feature = "alloc")]
pub type BoxedTransport = Box<dyn Transport + Send>;

/// Bypass adapter
#[cfg(feature = "alloc")]
#[derive(Default)]
pub struct Lle {
    transport: Option<BoxedTransport>,
}

#[cfg(feature = "alloc")]
impl core::fmt::Debug for Lle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Lle")
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(feature = "alloc")]
impl Lle {
    /// Adapter with no peer; every request falls through
    pub fn disconnected() -> Self {
        Self { transport: None }
    }

    /// Adapter over a connected transport
    ///
    /// Runs the `Init` handshake; a peer that does not answer is dropped.
    pub fn connect(transport: BoxedTransport) -> Self {
        let mut lle = Self {
            transport: Some(transport),
        };
        if lle.request(LleRequest::Init, 0, 0).is_none() {
            log::warn!("LLE peer did not answer init");
        }
        lle
    }

    /// Whether requests are currently forwarded
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Forward one request
    ///
    /// Returns `None` when no peer is connected or the round-trip failed.
    pub fn request(&mut self, kind: LleRequest, address: u8, value: u8) -> Option<u8> {
        let transport = self.transport.as_mut()?;
        let request = kind.encode(address, value);
        let mut response = [0u8; 1];

        let result = transport
            .send(&request)
            .and_then(|()| transport.recv(&mut response));

        match result {
            Ok(()) => {
                log::trace!(
                    "lle request({:?}, 0x{:02X}, 0x{:02X}) = 0x{:02X}",
                    kind,
                    address,
                    value,
                    response[0]
                );
                Some(response[0])
            }
            Err(e) => {
                log::warn!("LLE {:?} request failed: {}; using high-level emulation", kind, e);
                self.transport = None;
                None
            }
        }
    }

    /// Drop the peer
    pub fn close(&mut self) {
        if self.transport.take().is_some() {
            log::debug!("LLE channel closed");
        }
    }
}
