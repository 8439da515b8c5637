//! Announcement listener.
//!
//! Receives announcement datagrams from peers on the announce port and
//! upserts catalog entries. Self-originated announcements are dropped.
//! There is no expiry task — the catalog computes freshness on read.

use std::net::{Ipv4Addr, SocketAddrV4};

use anyhow::{Context, Result};
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use uuid::Uuid;

use clipway_core::announce::Announcement;
use clipway_services::PeerCatalog;

/// Bind the announce socket. Port 0 asks the OS for an ephemeral port.
pub fn bind(port: u16) -> Result<std::net::UdpSocket> {
    make_listener_socket(port)
}

/// Listen for announcements and populate the peer catalog.
///
/// Runs forever — cancel by aborting the task handle.
pub async fn listener_loop(
    catalog: PeerCatalog,
    local_identity: Uuid,
    socket: std::net::UdpSocket,
) -> Result<()> {
    let socket = UdpSocket::from_std(socket).context("failed to convert to tokio UdpSocket")?;
    let port = socket.local_addr().map(|a| a.port()).unwrap_or(0);

    let mut buf = vec![0u8; 2048];

    tracing::info!(port, "discovery listener starting");

    loop {
        let (len, peer_addr) = match socket.recv_from(&mut buf).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "recv_from failed");
                continue;
            }
        };

        let Some(announcement) = Announcement::decode(&buf[..len]) else {
            tracing::trace!(from = %peer_addr, "ignoring unrecognized datagram");
            continue;
        };

        if announcement.identity == local_identity {
            tracing::trace!("ignoring own announcement");
            continue;
        }

        tracing::debug!(
            identity = %announcement.identity,
            device = %announcement.device_name,
            addr = %peer_addr,
            port = announcement.port,
            "peer announcement"
        );
        catalog.upsert(&announcement, peer_addr.ip());
    }
}

/// Create a UDP socket bound to the announce port.
fn make_listener_socket(port: u16) -> Result<std::net::UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP)).context("socket()")?;

    socket.set_reuse_address(true).context("SO_REUSEADDR")?;
    socket.set_nonblocking(true).context("set_nonblocking")?;

    let bind_addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port);
    socket.bind(&bind_addr.into()).context("bind()")?;

    Ok(socket.into())
}
