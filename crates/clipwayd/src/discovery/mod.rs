//! Discovery engine — makes this node visible to peers and keeps a live
//! view of them. Emission and listening are independent loops; a node can
//! catalog peers while itself invisible.

pub mod broadcast;
pub mod listener;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use tokio::task::JoinHandle;
use uuid::Uuid;

use clipway_services::{PeerCatalog, SettingsStore};

pub struct Discovery {
    catalog: PeerCatalog,
    settings: SettingsStore,
    identity: Uuid,
    device_name: String,
    announce_port: u16,
    announce_dest: SocketAddr,
    interval: Duration,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Discovery {
    pub fn new(
        catalog: PeerCatalog,
        settings: SettingsStore,
        identity: Uuid,
        device_name: String,
        announce_port: u16,
        interval: Duration,
    ) -> Self {
        Self {
            catalog,
            settings,
            identity,
            device_name,
            announce_port,
            announce_dest: SocketAddr::new(IpAddr::V4(Ipv4Addr::BROADCAST), announce_port),
            interval,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Spawn the broadcast and listener loops. A second call while running
    /// is a no-op.
    pub fn start(&self) -> anyhow::Result<()> {
        let mut tasks = self.tasks.lock().unwrap_or_else(|p| p.into_inner());
        if !tasks.is_empty() {
            return Ok(());
        }

        let socket = listener::bind(self.announce_port)
            .with_context(|| format!("failed to bind announce port {}", self.announce_port))?;

        tasks.push(tokio::spawn({
            let settings = self.settings.clone();
            let device_name = self.device_name.clone();
            let identity = self.identity;
            let dest = self.announce_dest;
            let interval = self.interval;
            async move {
                if let Err(e) =
                    broadcast::broadcast_loop(settings, identity, device_name, dest, interval).await
                {
                    tracing::error!(error = %e, "discovery broadcast failed");
                }
            }
        }));

        tasks.push(tokio::spawn({
            let catalog = self.catalog.clone();
            let identity = self.identity;
            async move {
                if let Err(e) = listener::listener_loop(catalog, identity, socket).await {
                    tracing::error!(error = %e, "discovery listener failed");
                }
            }
        }));

        Ok(())
    }

    /// Halt both loops and release their sockets. Idempotent; safe to call
    /// when never started.
    pub fn stop(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(|p| p.into_inner());
        if tasks.is_empty() {
            return;
        }
        tracing::info!("discovery stopping");
        for task in tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for Discovery {
    fn drop(&mut self) {
        self.stop();
    }
}
