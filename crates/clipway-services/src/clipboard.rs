//! Clipboard write-sink.
//!
//! The OS clipboard belongs to the desktop shell, which subscribes to the
//! event bus. The sink stages the latest text so the shell (and tests) can
//! read back what should be on the clipboard.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::events::{UiEvent, UiEventBus};

#[derive(Clone)]
pub struct ClipboardSink {
    staged: Arc<RwLock<Option<String>>>,
    events: UiEventBus,
}

impl ClipboardSink {
    pub fn new(events: UiEventBus) -> Self {
        Self {
            staged: Arc::new(RwLock::new(None)),
            events,
        }
    }

    pub async fn write_text(&self, text: &str) {
        {
            let mut staged = self.staged.write().await;
            *staged = Some(text.to_string());
        }
        tracing::debug!(len = text.len(), "clipboard text staged");
        self.events.publish(UiEvent::ClipboardWritten {
            text: text.to_string(),
        });
    }

    pub async fn staged(&self) -> Option<String> {
        self.staged.read().await.clone()
    }
}
