//! Peer catalog — tracks nodes discovered on the local network.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

use clipway_core::announce::Announcement;

/// A discovered remote instance of the application.
#[derive(Debug, Clone)]
pub struct PeerNode {
    pub identity: Uuid,

    /// Address the announcement arrived from.
    pub ip: IpAddr,

    /// HTTP port the peer serves on.
    pub port: u16,

    pub device_name: String,

    /// Last time any announcement arrived from this node.
    pub last_seen: Instant,
}

impl PeerNode {
    pub fn is_fresh(&self, window: Duration) -> bool {
        self.last_seen.elapsed() < window
    }
}

/// Catalog of peers, keyed by identity.
///
/// Writes come from the discovery listener; reads from the control surface.
/// Staleness is computed on read — entries are never reaped, only excluded
/// once their last announcement falls outside the freshness window (and
/// overwritten if the node re-announces).
pub struct PeerCatalog {
    nodes: Arc<DashMap<Uuid, PeerNode>>,
    freshness: Duration,
}

impl PeerCatalog {
    pub fn new(freshness: Duration) -> Self {
        Self {
            nodes: Arc::new(DashMap::new()),
            freshness,
        }
    }

    /// Record an announcement, refreshing `last_seen` for a known identity.
    pub fn upsert(&self, ann: &Announcement, ip: IpAddr) {
        self.insert(PeerNode {
            identity: ann.identity,
            ip,
            port: ann.port,
            device_name: ann.device_name.clone(),
            last_seen: Instant::now(),
        });
    }

    pub fn insert(&self, node: PeerNode) {
        self.nodes.insert(node.identity, node);
    }

    /// Fresh nodes only.
    pub fn active(&self) -> Vec<PeerNode> {
        self.nodes
            .iter()
            .filter(|e| e.value().is_fresh(self.freshness))
            .map(|e| e.value().clone())
            .collect()
    }

    /// Total tracked entries, stale included. Diagnostics only.
    pub fn tracked(&self) -> usize {
        self.nodes.len()
    }

    pub fn freshness_window(&self) -> Duration {
        self.freshness
    }
}

impl Clone for PeerCatalog {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            freshness: self.freshness,
        }
    }
}
