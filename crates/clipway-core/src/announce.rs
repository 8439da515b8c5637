//! Discovery wire contract.
//!
//! Nodes announce themselves with a small JSON datagram broadcast on the
//! local network. Receivers upsert a catalog entry per identity and filter
//! out their own announcements.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// UDP port announcements are sent to and received on.
pub const ANNOUNCE_PORT: u16 = 41234;

/// Seconds between announcements.
pub const ANNOUNCE_INTERVAL_SECS: u64 = 5;

/// A catalog entry is fresh while its last announcement is younger than
/// this. Twice the announce interval, so one lost datagram is tolerated.
pub const FRESHNESS_WINDOW_SECS: u64 = 2 * ANNOUNCE_INTERVAL_SECS;

/// Service tag carried in every announcement. Datagrams from other
/// applications sharing the port are dropped on this field.
pub const SERVICE_NAME: &str = "clipway";

/// One announcement datagram.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub service: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub device_name: String,
    /// HTTP port peers should connect to.
    pub port: u16,
    pub identity: Uuid,
    /// Sender's clock, unix seconds. Informational; receivers track
    /// freshness with their own clock.
    pub timestamp: u64,
}

impl Announcement {
    pub fn new(device_name: String, port: u16, identity: Uuid) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            service: SERVICE_NAME.to_string(),
            kind: "announce".to_string(),
            device_name,
            port,
            identity,
            timestamp,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        // Announcement contains no map keys that can fail to serialize
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Parse a received datagram. Returns None for malformed payloads and
    /// for datagrams belonging to another service.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let ann: Announcement = serde_json::from_slice(bytes).ok()?;
        if ann.service != SERVICE_NAME {
            return None;
        }
        Some(ann)
    }
}
