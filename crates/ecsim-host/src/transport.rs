//! Transports to the low-level emulation peer
//!
//! This module provides UDP and TCP implementations of the core
//! [`Transport`] trait.

use std::net::{SocketAddr, ToSocketAddrs};

use ecsim_core::{BoxedTransport, Error as CoreError, Result as CoreResult, Transport};

use crate::config::{LleConfig, TransportKind};
use crate::error::{HostError, Result};

fn io_failure(what: &str, e: std::io::Error) -> CoreError {
    log::warn!("lle {}: {}", what, e);
    CoreError::TransportFailed
}

/// Resolve `host:port` to the first socket address it names
fn resolve(endpoint: &str) -> Result<SocketAddr> {
    endpoint
        .to_socket_addrs()
        .map_err(|e| HostError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?
        .next()
        .ok_or_else(|| HostError::InvalidEndpoint(format!("{}: no addresses", endpoint)))
}

pub mod udp {
    //! UDP datagram transport

    use super::*;
    use std::net::UdpSocket;
    use std::time::Duration;

    /// Connected UDP socket; one datagram per request and per response
    pub struct UdpTransport {
        socket: UdpSocket,
    }

    impl UdpTransport {
        /// Connect to a peer at `host:port`
        pub fn connect(endpoint: &str, timeout: Option<Duration>) -> Result<Self> {
            let peer = resolve(endpoint)?;
            let local = if peer.is_ipv6() { "[::]:0" } else { "0.0.0.0:0" };
            let socket = UdpSocket::bind(local)
                .map_err(|e| HostError::ConnectionFailed(format!("socket: {}", e)))?;
            socket
                .connect(peer)
                .map_err(|e| HostError::ConnectionFailed(format!("connect {}: {}", endpoint, e)))?;
            socket.set_read_timeout(timeout).map_err(|e| {
                HostError::ConnectionFailed(format!("Failed to set read timeout: {}", e))
            })?;

            log::debug!("UDP socket connected to {}", endpoint);

            Ok(Self { socket })
        }
    }

    impl Transport for UdpTransport {
        fn send(&mut self, request: &[u8; 3]) -> CoreResult<()> {
            let sent = self
                .socket
                .send(request)
                .map_err(|e| io_failure("send", e))?;
            if sent < request.len() {
                return Err(CoreError::ShortSend { sent });
            }
            Ok(())
        }

        fn recv(&mut self, response: &mut [u8; 1]) -> CoreResult<()> {
            let received = self
                .socket
                .recv(response)
                .map_err(|e| io_failure("recv", e))?;
            if received < response.len() {
                return Err(CoreError::ShortReceive);
            }
            Ok(())
        }
    }
}

pub mod tcp {
    //! TCP stream transport

    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpStream;
    use std::time::Duration;

    /// TCP connection to the peer
    pub struct TcpTransport {
        stream: TcpStream,
    }

    impl TcpTransport {
        /// Connect to a peer at `host:port`
        pub fn connect(endpoint: &str, timeout: Option<Duration>) -> Result<Self> {
            let stream = TcpStream::connect(resolve(endpoint)?)
                .map_err(|e| HostError::ConnectionFailed(format!("connect {}: {}", endpoint, e)))?;

            // Set TCP_NODELAY to reduce latency
            stream.set_nodelay(true).map_err(|e| {
                HostError::ConnectionFailed(format!("Failed to set TCP_NODELAY: {}", e))
            })?;
            stream.set_read_timeout(timeout).map_err(|e| {
                HostError::ConnectionFailed(format!("Failed to set read timeout: {}", e))
            })?;
            stream.set_write_timeout(timeout).map_err(|e| {
                HostError::ConnectionFailed(format!("Failed to set write timeout: {}", e))
            })?;

            log::debug!("TCP stream connected to {}", endpoint);

            Ok(Self { stream })
        }
    }

    impl Transport for TcpTransport {
        fn send(&mut self, request: &[u8; 3]) -> CoreResult<()> {
            self.stream
                .write_all(request)
                .map_err(|e| io_failure("send", e))
        }

        fn recv(&mut self, response: &mut [u8; 1]) -> CoreResult<()> {
            match self.stream.read(response) {
                Ok(0) => Err(CoreError::ShortReceive),
                Ok(_) => Ok(()),
                Err(e) => Err(io_failure("recv", e)),
            }
        }
    }
}

pub use tcp::TcpTransport;
pub use udp::UdpTransport;

/// Open the transport described by `config`
pub fn open_transport(config: &LleConfig) -> Result<BoxedTransport> {
    let timeout = config
        .timeout_ms
        .filter(|&ms| ms > 0)
        .map(std::time::Duration::from_millis);
    let transport: BoxedTransport = match config.transport {
        TransportKind::Udp => Box::new(UdpTransport::connect(&config.endpoint, timeout)?),
        TransportKind::Tcp => Box::new(TcpTransport::connect(&config.endpoint, timeout)?),
    };
    Ok(transport)
}
