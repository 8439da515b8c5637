//! Configuration system for clipway.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $CLIPWAY_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/clipway/config.toml
//!   3. ~/.config/clipway/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipwayConfig {
    pub network: NetworkConfig,
    pub discovery: DiscoveryConfig,
    pub relay: RelayConfig,
    pub confirmation: ConfirmationConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// HTTP port peers connect to.
    pub server_port: u16,
    /// Localhost-only port for the control surface.
    pub control_port: u16,
    /// UDP port announcements are sent to and received on.
    pub announce_port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Whether this node announces itself. Listening is unaffected.
    pub discoverable: bool,
    /// Seconds between announcements.
    pub announce_interval_secs: u64,
    /// Name shown to peers. Empty = OS hostname.
    pub device_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// How long a poll request is held open before it expires.
    pub poll_deadline_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Require a local accept/decline decision before inbound content is applied.
    pub required: bool,
    /// Seconds before an unanswered confirmation auto-declines.
    /// Must stay below relay.poll_deadline_secs so the HTTP layer never
    /// waits on a decision that outlives its connection.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root for uploads/, shareables/, and the content log database.
    pub data_dir: PathBuf,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for ClipwayConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            discovery: DiscoveryConfig::default(),
            relay: RelayConfig::default(),
            confirmation: ConfirmationConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            server_port: 5050,
            control_port: 5051,
            announce_port: crate::announce::ANNOUNCE_PORT,
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            discoverable: true,
            announce_interval_secs: crate::announce::ANNOUNCE_INTERVAL_SECS,
            device_name: String::new(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            poll_deadline_secs: 30,
        }
    }
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            required: false,
            timeout_secs: 25,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: data_dir(),
        }
    }
}

impl DiscoveryConfig {
    /// Effective device name: config value, or the OS hostname.
    pub fn effective_device_name(&self) -> String {
        if !self.device_name.is_empty() {
            return self.device_name.clone();
        }
        hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "clipway".to_string())
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".config"))
        .join("clipway")
}

pub fn data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".local").join("share"))
        .join("clipway")
}

fn dirs_or_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl ClipwayConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::file_path();
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadFailed(path.clone(), e))?;
            toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.clone(), e))?
        } else {
            ClipwayConfig::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("CLIPWAY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
            }
            let text = toml::to_string_pretty(&ClipwayConfig::default())
                .map_err(ConfigError::SerializeFailed)?;
            std::fs::write(&path, text)
                .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
        }
        Ok(path)
    }

    /// Apply CLIPWAY_* env var overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("CLIPWAY_NETWORK__SERVER_PORT") {
            if let Ok(p) = v.parse() {
                self.network.server_port = p;
            }
        }
        if let Ok(v) = std::env::var("CLIPWAY_NETWORK__CONTROL_PORT") {
            if let Ok(p) = v.parse() {
                self.network.control_port = p;
            }
        }
        if let Ok(v) = std::env::var("CLIPWAY_NETWORK__ANNOUNCE_PORT") {
            if let Ok(p) = v.parse() {
                self.network.announce_port = p;
            }
        }
        if let Ok(v) = std::env::var("CLIPWAY_DISCOVERY__DISCOVERABLE") {
            self.discovery.discoverable = v == "true" || v == "1";
        }
        if let Ok(v) = std::env::var("CLIPWAY_DISCOVERY__DEVICE_NAME") {
            self.discovery.device_name = v;
        }
        if let Ok(v) = std::env::var("CLIPWAY_CONFIRMATION__REQUIRED") {
            self.confirmation.required = v == "true" || v == "1";
        }
        if let Ok(v) = std::env::var("CLIPWAY_STORAGE__DATA_DIR") {
            self.storage.data_dir = PathBuf::from(v);
        }
    }
}
