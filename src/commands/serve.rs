//! Serve command implementation

use ecsim_core::Ec;
use ecsim_host::{HostConfig, Peer};
use std::net::{TcpListener, UdpSocket};

/// Answer low-level emulation requests until interrupted
///
/// The served EC never bypasses itself: its own peer settings are ignored.
pub fn cmd_serve(
    config: &HostConfig,
    listen: &str,
    tcp: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut peer = Peer::new(Ec::new(&config.ec));

    if tcp {
        let listener = TcpListener::bind(listen)
            .map_err(|e| format!("Failed to listen on {}: {}", listen, e))?;
        log::info!("Serving LLE requests on tcp://{}", listener.local_addr()?);
        peer.serve_tcp(&listener)?;
    } else {
        let socket =
            UdpSocket::bind(listen).map_err(|e| format!("Failed to bind {}: {}", listen, e))?;
        log::info!("Serving LLE requests on udp://{}", socket.local_addr()?);
        peer.serve_udp(&socket, None)?;
    }

    log::info!("Served {} requests", peer.served());
    Ok(())
}
