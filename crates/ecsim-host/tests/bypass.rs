//! End-to-end bypass through a peer server on loopback

use std::net::{TcpListener, UdpSocket};
use std::thread;

use ecsim_core::{Ec, EcConfig, State};
use ecsim_host::{open_ec, HostConfig, Peer, TransportKind};

fn peer() -> Peer {
    Peer::new(Ec::new(&EcConfig::default()))
}

#[test]
fn udp_bypass_then_fallback() {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    let addr = socket.local_addr().unwrap();

    // init + one write + one read
    let server = thread::spawn(move || {
        let mut peer = peer();
        peer.serve_udp(&socket, Some(3)).unwrap();
        peer.ec().state()
    });

    let mut config = HostConfig::default();
    config.lle.endpoint = addr.to_string();
    config.lle.timeout_ms = Some(500);
    let mut ec = open_ec(&config);
    assert!(ec.is_low_level());

    ec.write(0x66, 0x92);
    assert_eq!(ec.read(0x62), b'N');
    // The local model never saw the command
    assert_eq!(ec.state(), State::Idle);

    assert_eq!(server.join().unwrap(), State::GetProject);

    // Peer is gone: the next access falls back for good
    assert_eq!(ec.read(0x62), 0);
    assert!(!ec.is_low_level());
    ec.write(0x66, 0x92);
    assert_eq!(ec.read(0x62), b'N');
}

#[test]
fn tcp_bypass_until_shutdown() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut peer = peer();
        peer.serve_stream(stream).unwrap();
        (peer.served(), peer.ec().superio().address())
    });

    let mut config = HostConfig::default();
    config.lle.transport = TransportKind::Tcp;
    config.lle.endpoint = addr.to_string();
    let mut ec = open_ec(&config);
    assert!(ec.is_low_level());

    ec.write(0x2E, 0x21);
    assert_eq!(ec.read(0x2F), 0x87);
    assert_eq!(ec.superio().address(), 0x00);

    ec.shutdown();
    assert!(!ec.is_low_level());

    let (served, address) = server.join().unwrap();
    assert_eq!(served, 3);
    assert_eq!(address, 0x21);
}
