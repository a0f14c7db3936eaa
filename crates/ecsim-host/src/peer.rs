//! Low-level emulation peer server
//!
//! Answers bypass requests from another ecsim (or any client speaking the
//! 3-byte request / 1-byte response protocol) using an internal-emulation
//! [`Ec`]. Useful for exercising the bypass path end to end, and as a
//! reference for the wire contract.

use std::io::{ErrorKind, Read, Write};
use std::net::{TcpListener, TcpStream, UdpSocket};

use ecsim_core::{Ec, LleRequest};

use crate::error::Result;

/// Peer answering requests from an EC model
pub struct Peer {
    ec: Ec,
    served: usize,
}

impl Peer {
    /// Serve requests with the given EC
    pub fn new(ec: Ec) -> Self {
        Self { ec, served: 0 }
    }

    /// The EC behind the peer
    pub fn ec(&self) -> &Ec {
        &self.ec
    }

    /// Number of requests answered so far
    pub fn served(&self) -> usize {
        self.served
    }

    /// Answer one request
    ///
    /// Writes echo the written value; unknown request kinds answer 0.
    pub fn handle(&mut self, request: &[u8; 3]) -> u8 {
        let [kind, port, value] = *request;
        self.served += 1;
        match LleRequest::from_byte(kind) {
            Some(LleRequest::Init) => {
                log::debug!("peer init");
                0
            }
            Some(LleRequest::Read) => {
                let value = self.ec.read(port);
                log::trace!("peer read 0x{:02X} = 0x{:02X}", port, value);
                value
            }
            Some(LleRequest::Write) => {
                self.ec.write(port, value);
                log::trace!("peer write 0x{:02X}, 0x{:02X}", port, value);
                value
            }
            None => {
                log::warn!("peer: unknown request 0x{:02X}", kind);
                0
            }
        }
    }

    /// Serve datagrams on `socket`
    ///
    /// Returns after `limit` requests, or never when `limit` is `None`.
    pub fn serve_udp(&mut self, socket: &UdpSocket, limit: Option<usize>) -> Result<()> {
        let mut buf = [0u8; 16];
        let mut count = 0;
        while limit.map_or(true, |limit| count < limit) {
            let (len, src) = socket.recv_from(&mut buf)?;
            if len != 3 {
                log::warn!("peer: dropping {}-byte datagram from {}", len, src);
                continue;
            }
            let request = [buf[0], buf[1], buf[2]];
            let response = self.handle(&request);
            socket.send_to(&[response], src)?;
            count += 1;
        }
        Ok(())
    }

    /// Serve one stream connection until the client hangs up
    pub fn serve_stream(&mut self, mut stream: TcpStream) -> Result<()> {
        stream.set_nodelay(true)?;
        let mut request = [0u8; 3];
        loop {
            match stream.read_exact(&mut request) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                    log::debug!("peer: client disconnected");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }
            let response = self.handle(&request);
            stream.write_all(&[response])?;
        }
    }

    /// Accept and serve stream connections one after another
    pub fn serve_tcp(&mut self, listener: &TcpListener) -> Result<()> {
        for stream in listener.incoming() {
            let stream = stream?;
            log::info!("peer: connection from {}", stream.peer_addr()?);
            if let Err(e) = self.serve_stream(stream) {
                log::warn!("peer: connection error: {}", e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecsim_core::{EcConfig, State};

    fn peer() -> Peer {
        Peer::new(Ec::new(&EcConfig::default()))
    }

    #[test]
    fn test_init() {
        let mut peer = peer();
        assert_eq!(peer.handle(&[0x00, 0x00, 0x00]), 0);
        assert_eq!(peer.served(), 1);
    }

    #[test]
    fn test_write_echo_and_read() {
        let mut peer = peer();
        assert_eq!(peer.handle(&[0x02, 0x66, 0x92]), 0x92);
        assert_eq!(peer.ec().state(), State::GetProject);
        assert_eq!(peer.handle(&[0x01, 0x62, 0x00]), b'N');
    }

    #[test]
    fn test_unknown_kind() {
        let mut peer = peer();
        assert_eq!(peer.handle(&[0x07, 0x66, 0x92]), 0);
        assert_eq!(peer.ec().state(), State::Idle);
    }
}
