//! Announcement broadcast.
//!
//! Periodically sends this node's announcement datagram to the local
//! broadcast address so nearby peers can catalog it. Emission is gated on
//! the discoverability setting each tick; the listening side is separate
//! and unaffected.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use socket2::{Domain, Protocol, Socket, Type};
use tokio::time;
use uuid::Uuid;

use clipway_core::announce::Announcement;
use clipway_services::SettingsStore;

/// Broadcast announcements on a regular interval.
///
/// Runs forever — cancel by aborting the task handle. Send failures are
/// logged and retried on the next tick.
pub async fn broadcast_loop(
    settings: SettingsStore,
    identity: Uuid,
    device_name: String,
    dest: SocketAddr,
    interval: Duration,
) -> Result<()> {
    let socket =
        make_broadcast_socket().context("failed to create discovery broadcast socket")?;

    let mut ticker = time::interval(interval);

    tracing::info!(
        %dest,
        interval_secs = interval.as_secs(),
        "discovery broadcast starting"
    );

    loop {
        ticker.tick().await;

        if !settings.is_discoverable().await {
            tracing::trace!("not discoverable, skipping announcement");
            continue;
        }

        let port = settings.current().await.server_port;
        let announcement = Announcement::new(device_name.clone(), port, identity);
        match socket.send_to(&announcement.encode(), &dest.into()) {
            Ok(n) => tracing::trace!(bytes = n, "announcement sent"),
            Err(e) => tracing::warn!(error = %e, "announcement send failed"),
        }
    }
}

/// Create a UDP socket suitable for sending IPv4 broadcast.
fn make_broadcast_socket() -> Result<Socket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP)).context("socket()")?;

    socket.set_reuse_address(true).context("SO_REUSEADDR")?;
    socket.set_broadcast(true).context("SO_BROADCAST")?;

    Ok(socket)
}
