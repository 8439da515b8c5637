//! Runtime settings — discoverability plus the cached local endpoint.
//!
//! Unlike the static TOML config, these change while the daemon runs (the
//! shell toggles discoverability) and survive restarts as a small JSON file.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// What the control surface reads and writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Whether this node announces itself. Listening is unaffected.
    pub is_discoverable: bool,
    /// LAN address peers reach this node on.
    pub server_ip: String,
    pub server_port: u16,
}

#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<RwLock<Settings>>,
    persist_path: Arc<Option<PathBuf>>,
}

impl SettingsStore {
    pub fn new(server_port: u16, discoverable: bool) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Settings {
                is_discoverable: discoverable,
                server_ip: detect_server_ip(),
                server_port,
            })),
            persist_path: Arc::new(None),
        }
    }

    /// Create a store that persists to `path`. A previously saved
    /// discoverability choice wins over the config default; the ip is
    /// always re-detected since addresses change between runs.
    pub fn with_persistence(path: PathBuf, server_port: u16, discoverable: bool) -> Self {
        let mut settings = Settings {
            is_discoverable: discoverable,
            server_ip: detect_server_ip(),
            server_port,
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Settings>(&text) {
                Ok(saved) => settings.is_discoverable = saved.is_discoverable,
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "failed to parse saved settings")
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "failed to read saved settings")
            }
        }

        let store = Self {
            inner: Arc::new(RwLock::new(settings.clone())),
            persist_path: Arc::new(Some(path)),
        };
        store.save_to_disk(&settings);
        store
    }

    pub async fn current(&self) -> Settings {
        self.inner.read().await.clone()
    }

    pub async fn is_discoverable(&self) -> bool {
        self.inner.read().await.is_discoverable
    }

    /// Toggle announcement emission. The listening side never consults this.
    pub async fn set_discoverable(&self, discoverable: bool) {
        let snapshot = {
            let mut inner = self.inner.write().await;
            inner.is_discoverable = discoverable;
            inner.clone()
        };
        tracing::info!(discoverable, "discoverability updated");
        self.save_to_disk(&snapshot);
    }

    pub async fn update(&self, settings: Settings) {
        {
            let mut inner = self.inner.write().await;
            *inner = settings.clone();
        }
        self.save_to_disk(&settings);
    }

    /// Serialize to disk. Best-effort — logs on failure.
    fn save_to_disk(&self, snapshot: &Settings) {
        let path = match self.persist_path.as_ref() {
            Some(p) => p,
            None => return,
        };
        match serde_json::to_string_pretty(snapshot) {
            Ok(json) => {
                if let Some(parent) = path.parent() {
                    let _ = std::fs::create_dir_all(parent);
                }
                if let Err(e) = std::fs::write(path, json) {
                    tracing::warn!(error = %e, path = %path.display(), "failed to persist settings");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize settings"),
        }
    }
}

/// Best non-loopback LAN address, falling back to localhost on hosts with
/// no usable interface.
fn detect_server_ip() -> String {
    local_ip_address::local_ip()
        .map(|ip| ip.to_string())
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not detect a LAN address");
            "127.0.0.1".to_string()
        })
}
