//! HTTP handlers — the peer-facing `/api` surface and the local `/control`
//! surface. Bodies are deserialized into typed shapes before any core state
//! is touched; failures become structured `{success:false, message}` JSON.

pub mod control;
pub mod files;
pub mod inbound;
pub mod relay;

use std::path::PathBuf;

use serde::Serialize;

use clipway_services::{
    ClipboardSink, ConfirmationGate, ContentLogStore, PeerCatalog, RelayManager, SettingsStore,
    UiEventBus,
};

#[derive(Clone)]
pub struct ApiState {
    pub catalog: PeerCatalog,
    pub relay: RelayManager,
    pub gate: ConfirmationGate,
    pub settings: SettingsStore,
    pub content_log: ContentLogStore,
    pub clipboard: ClipboardSink,
    pub events: UiEventBus,
    /// Root for uploads/ and shareables/.
    pub storage_root: PathBuf,
    /// Name this node presents to peers.
    pub device_name: String,
    /// Route inbound content through the confirmation gate.
    pub confirmation_required: bool,
}

/// Minimal `{success, message?}` body shared by several routes.
#[derive(Serialize)]
pub struct ApiMessage {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiMessage {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn ok_with(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn fail() -> Self {
        Self {
            success: false,
            message: None,
        }
    }

    pub fn fail_with(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}
