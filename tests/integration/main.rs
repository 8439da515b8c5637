//! Clipway integration test harness.
//!
//! Each test spins a real daemon stack in-process: the axum peer and
//! control surfaces on ephemeral loopback listeners, the real services
//! underneath, and (where a test needs it) the discovery loops on loopback
//! UDP. Requests go through reqwest like a companion device would.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tokio::net::TcpListener;

use clipway_services::{
    ClipboardSink, ConfirmationGate, ContentLogStore, PeerCatalog, RelayManager, SettingsStore,
    UiEventBus,
};

mod control;
mod discovery;
mod files;
mod relay;

// ── Harness ───────────────────────────────────────────────────────────────────

pub struct TestOptions {
    pub poll_deadline: Duration,
    pub confirmation_required: bool,
    pub confirmation_timeout: Duration,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            poll_deadline: Duration::from_secs(5),
            confirmation_required: false,
            confirmation_timeout: Duration::from_secs(2),
        }
    }
}

pub struct TestDaemon {
    pub peer_addr: SocketAddr,
    pub control_addr: SocketAddr,
    pub state: clipway_api::ApiState,
    pub storage_root: PathBuf,
}

impl TestDaemon {
    pub fn peer_url(&self, path: &str) -> String {
        format!("http://{}{}", self.peer_addr, path)
    }

    pub fn control_url(&self, path: &str) -> String {
        format!("http://{}{}", self.control_addr, path)
    }
}

static NEXT_DAEMON: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

/// Bind both surfaces on ephemeral loopback ports and serve the real
/// routers over a fresh service stack.
pub async fn spawn_daemon(opts: TestOptions) -> TestDaemon {
    let n = NEXT_DAEMON.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    let storage_root = std::env::temp_dir().join(format!(
        "clipway-integration-{}-{}",
        std::process::id(),
        n
    ));
    std::fs::create_dir_all(&storage_root).expect("create storage root");

    let peer_listener = TcpListener::bind("127.0.0.1:0").await.expect("bind peer");
    let control_listener = TcpListener::bind("127.0.0.1:0").await.expect("bind control");
    let peer_addr = peer_listener.local_addr().unwrap();
    let control_addr = control_listener.local_addr().unwrap();

    let events = UiEventBus::new();
    let settings = SettingsStore::new(peer_addr.port(), true);
    let catalog = PeerCatalog::new(Duration::from_secs(10));
    let relay = RelayManager::new(opts.poll_deadline, settings.clone(), events.clone());
    let gate = ConfirmationGate::new(opts.confirmation_timeout, events.clone());
    let content_log = ContentLogStore::open_in_memory().expect("open content log");
    let clipboard = ClipboardSink::new(events.clone());

    let state = clipway_api::ApiState {
        catalog,
        relay,
        gate,
        settings,
        content_log,
        clipboard,
        events,
        storage_root: storage_root.clone(),
        device_name: "test-node".to_string(),
        confirmation_required: opts.confirmation_required,
    };

    tokio::spawn({
        let state = state.clone();
        async move {
            let _ = clipway_api::serve_peer(state, peer_listener).await;
        }
    });
    tokio::spawn({
        let state = state.clone();
        async move {
            let _ = clipway_api::serve_control(state, control_listener).await;
        }
    });

    TestDaemon {
        peer_addr,
        control_addr,
        state,
        storage_root,
    }
}

/// POST a JSON body and give back (status, parsed body).
pub async fn post_json(
    url: &str,
    body: serde_json::Value,
) -> (reqwest::StatusCode, serde_json::Value) {
    let resp = reqwest::Client::new()
        .post(url)
        .json(&body)
        .send()
        .await
        .expect("request failed");
    let status = resp.status();
    let body = resp.json().await.expect("invalid json response");
    (status, body)
}

pub async fn get_json(url: &str) -> (reqwest::StatusCode, serde_json::Value) {
    let resp = reqwest::get(url).await.expect("request failed");
    let status = resp.status();
    let body = resp.json().await.expect("invalid json response");
    (status, body)
}
