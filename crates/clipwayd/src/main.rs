//! clipwayd — clipway LAN content relay daemon.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use uuid::Uuid;

use clipway_core::config::ClipwayConfig;
use clipway_services::{
    ClipboardSink, ConfirmationGate, ContentLogStore, PeerCatalog, RelayManager, SettingsStore,
    UiEventBus,
};

use clipwayd::{discovery, notify};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config
    if let Err(e) = ClipwayConfig::write_default_if_missing() {
        tracing::warn!(error = %e, "failed to write default config");
    }
    let config = ClipwayConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        ClipwayConfig::default()
    });

    let device_name = config.discovery.effective_device_name();
    let identity = Uuid::new_v4();
    tracing::info!(%identity, device_name, "clipwayd starting");

    let storage_root = config.storage.data_dir.clone();
    std::fs::create_dir_all(&storage_root)
        .with_context(|| format!("failed to create data dir {}", storage_root.display()))?;

    // Shared state
    let events = UiEventBus::new();
    let settings = SettingsStore::with_persistence(
        storage_root.join("settings.json"),
        config.network.server_port,
        config.discovery.discoverable,
    );
    let catalog = PeerCatalog::new(Duration::from_secs(
        2 * config.discovery.announce_interval_secs,
    ));
    let relay = RelayManager::new(
        Duration::from_secs(config.relay.poll_deadline_secs),
        settings.clone(),
        events.clone(),
    );
    let gate = ConfirmationGate::new(
        Duration::from_secs(config.confirmation.timeout_secs),
        events.clone(),
    );
    let content_log =
        ContentLogStore::open(&storage_root.join("logs.db")).context("failed to open content log")?;
    let clipboard = ClipboardSink::new(events.clone());

    if config.confirmation.required {
        tracing::info!("inbound content requires confirmation");
    }

    // ── Shutdown channel ─────────────────────────────────────────────────────
    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);

    {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutdown signal received");
            let _ = shutdown.send(());
        });
    }

    // ── Discovery ────────────────────────────────────────────────────────────

    let discovery = discovery::Discovery::new(
        catalog.clone(),
        settings.clone(),
        identity,
        device_name.clone(),
        config.network.announce_port,
        Duration::from_secs(config.discovery.announce_interval_secs),
    );
    if let Err(e) = discovery.start() {
        // the node still relays over HTTP, it just won't see or be seen
        tracing::warn!(error = %e, "discovery failed to start");
    }

    // ── HTTP surfaces ────────────────────────────────────────────────────────

    let state = clipway_api::ApiState {
        catalog: catalog.clone(),
        relay: relay.clone(),
        gate: gate.clone(),
        settings: settings.clone(),
        content_log,
        clipboard,
        events: events.clone(),
        storage_root,
        device_name,
        confirmation_required: config.confirmation.required,
    };

    let peer_listener = TcpListener::bind(("0.0.0.0", config.network.server_port))
        .await
        .with_context(|| format!("failed to bind peer port {}", config.network.server_port))?;
    let control_listener = TcpListener::bind(("127.0.0.1", config.network.control_port))
        .await
        .with_context(|| format!("failed to bind control port {}", config.network.control_port))?;

    let peer_api_task = {
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = clipway_api::serve_peer(state, peer_listener).await {
                tracing::error!(error = %e, "peer API server failed");
            }
        })
    };

    let control_task = tokio::spawn(async move {
        if let Err(e) = clipway_api::serve_control(state, control_listener).await {
            tracing::error!(error = %e, "control surface server failed");
        }
    });

    let notify_task = tokio::spawn(notify::forward_events(events.subscribe()));

    // ── Wait for exit ────────────────────────────────────────────────────────

    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::select! {
        _ = shutdown_rx.recv() => tracing::info!("shutting down"),
        r = peer_api_task      => tracing::error!("peer API task exited: {:?}", r),
        r = control_task       => tracing::error!("control task exited: {:?}", r),
        r = notify_task        => tracing::error!("notify task exited: {:?}", r),
    }

    // Resolve any held poll connection before the process exits
    relay.cancel().await;
    discovery.stop();

    Ok(())
}
