//! UI event bus — what the (external) desktop shell subscribes to.
//!
//! The daemon never talks to a window directly; it publishes typed events
//! on a broadcast channel and the shell renders notifications, dialogs, and
//! clipboard writes from them. Publishing with no subscribers is fine.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::content::ContentKind;

#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Inbound text was accepted and staged on the clipboard.
    TextReceived {
        content: String,
        device_name: String,
        /// Looks like an http(s) link — the shell may open it.
        is_link: bool,
    },
    /// Content was handed to a waiting poll connection.
    ContentDelivered {
        content: String,
        url_scheme: Option<String>,
    },
    /// An uploaded file landed on disk.
    FileReceived {
        path: PathBuf,
        device_name: String,
    },
    /// A decision is needed before inbound content is applied.
    ConfirmationRequested {
        id: Uuid,
        device_name: String,
        content_preview: String,
        kind: ContentKind,
    },
    /// A companion device asked for the app to come to the foreground.
    ClientOpened { device_name: String },
    /// Text was staged for the OS clipboard.
    ClipboardWritten { text: String },
}

const BUS_CAPACITY: usize = 64;

/// Cheaply cloneable handle to the event channel.
#[derive(Clone)]
pub struct UiEventBus {
    tx: Arc<broadcast::Sender<UiEvent>>,
}

impl Default for UiEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl UiEventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.tx.subscribe()
    }

    /// Send an event to whoever is listening. A bus with no shell attached
    /// drops events silently.
    pub fn publish(&self, event: UiEvent) {
        let _ = self.tx.send(event);
    }
}
