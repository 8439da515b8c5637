//! Relay session manager — the single receive slot.
//!
//! A long-polling receiver arms the slot; a later sender (a peer, or the
//! local control surface) completes it; a deadline expires it. All three
//! race on the same slot, so every transition goes through the mutex and
//! the held response handle is a oneshot sender that is consumed by the
//! winning transition — a second completion is unrepresentable.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use tokio::sync::{oneshot, Mutex};

use clipway_core::normalize;

use crate::content::{sanitize_filename, FilePayload};
use crate::events::{UiEvent, UiEventBus};
use crate::settings::SettingsStore;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("a receiver is already awaiting content")]
    AlreadyAwaiting,
    #[error("no current session found")]
    NoActiveSession,
    #[error("failed to persist relayed file: {0}")]
    Persistence(#[from] std::io::Error),
}

/// What the held poll connection resolves with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollReply {
    Content {
        content: String,
        url_scheme: Option<String>,
    },
    File {
        file_url: String,
        file_name: String,
        file_type: String,
        file_size: u64,
    },
    TimedOut,
    Cancelled,
}

/// How the previous session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOutcome {
    Fulfilled,
    Expired,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Awaiting,
}

/// Point-in-time view for status reporting.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RelayStatus {
    pub phase: SessionPhase,
    pub last_outcome: Option<SessionOutcome>,
    /// How long the current session has been armed, if one is.
    pub held_secs: Option<u64>,
}

struct Awaiting {
    reply_tx: oneshot::Sender<PollReply>,
    timer: tokio::task::JoinHandle<()>,
    armed_at: Instant,
}

enum SlotState {
    Idle,
    Awaiting(Awaiting),
}

struct Slot {
    state: SlotState,
    /// Bumped on every arm and every completion; a deadline task only fires
    /// for the generation it was armed with, so a timer surviving its
    /// session can never expire the next one.
    generation: u64,
    last_outcome: Option<SessionOutcome>,
}

/// Owner of the rendezvous slot. All mutation funnels through here; the
/// HTTP boundary only ever holds the receiver half of a oneshot.
#[derive(Clone)]
pub struct RelayManager {
    slot: Arc<Mutex<Slot>>,
    deadline: Duration,
    settings: SettingsStore,
    events: UiEventBus,
}

impl RelayManager {
    pub fn new(deadline: Duration, settings: SettingsStore, events: UiEventBus) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                state: SlotState::Idle,
                generation: 0,
                last_outcome: None,
            })),
            deadline,
            settings,
            events,
        }
    }

    /// Arm the slot for one receiver. Valid only while idle; an armed slot
    /// rejects the call and keeps serving the original connection.
    pub async fn begin_wait(&self) -> Result<oneshot::Receiver<PollReply>, RelayError> {
        let mut slot = self.slot.lock().await;
        if matches!(slot.state, SlotState::Awaiting(_)) {
            return Err(RelayError::AlreadyAwaiting);
        }

        slot.generation += 1;
        let generation = slot.generation;
        let (reply_tx, reply_rx) = oneshot::channel();

        let timer = tokio::spawn({
            let manager = self.clone();
            let deadline = self.deadline;
            async move {
                tokio::time::sleep(deadline).await;
                manager.on_timeout(generation).await;
            }
        });

        slot.state = SlotState::Awaiting(Awaiting {
            reply_tx,
            timer,
            armed_at: Instant::now(),
        });
        tracing::debug!(generation, deadline = ?self.deadline, "receive slot armed");
        Ok(reply_rx)
    }

    /// Complete the armed session with text content.
    pub async fn deliver(&self, content: String) -> Result<(), RelayError> {
        let waiting = self.take_awaiting(SessionOutcome::Fulfilled).await?;
        waiting.timer.abort();

        let url_scheme = normalize::detect_scheme(&content);
        tracing::info!(
            len = content.len(),
            url_scheme = url_scheme.as_deref().unwrap_or("-"),
            "delivering content to waiting receiver"
        );

        let reply = PollReply::Content {
            content: content.clone(),
            url_scheme: url_scheme.clone(),
        };
        if waiting.reply_tx.send(reply).is_err() {
            tracing::warn!("poll connection went away before delivery");
        }

        self.events
            .publish(UiEvent::ContentDelivered { content, url_scheme });
        Ok(())
    }

    /// Complete the armed session with a file. Bytes are persisted under
    /// `<storage_root>/shareables` first and handed off by URL; a failed
    /// write leaves the session armed.
    pub async fn deliver_file(
        &self,
        file: FilePayload,
        storage_root: &Path,
    ) -> Result<(), RelayError> {
        let file_name = sanitize_filename(&file.name);
        let shareables = storage_root.join("shareables");
        tokio::fs::create_dir_all(&shareables).await?;
        let save_path = shareables.join(&file_name);
        tokio::fs::write(&save_path, &file.bytes).await?;
        tracing::info!(path = %save_path.display(), bytes = file.bytes.len(), "relayed file persisted");

        let settings = self.settings.current().await;
        let encoded = percent_encoding::utf8_percent_encode(&file_name, FILE_URL_SET);
        let file_url = format!(
            "http://{}:{}/api/files/{}",
            settings.server_ip, settings.server_port, encoded
        );

        let waiting = self.take_awaiting(SessionOutcome::Fulfilled).await?;
        waiting.timer.abort();

        let file_size = file.size();
        let reply = PollReply::File {
            file_url,
            file_name,
            file_type: file.mime_type,
            file_size,
        };
        if waiting.reply_tx.send(reply).is_err() {
            tracing::warn!("poll connection went away before file delivery");
        }
        Ok(())
    }

    /// Resolve an armed session as cancelled (shutdown path). Idle is fine.
    pub async fn cancel(&self) {
        if let Ok(waiting) = self.take_awaiting(SessionOutcome::Cancelled).await {
            waiting.timer.abort();
            tracing::info!("cancelling armed receive session");
            let _ = waiting.reply_tx.send(PollReply::Cancelled);
        }
    }

    pub async fn status(&self) -> RelayStatus {
        let slot = self.slot.lock().await;
        let (phase, held_secs) = match &slot.state {
            SlotState::Idle => (SessionPhase::Idle, None),
            SlotState::Awaiting(w) => (SessionPhase::Awaiting, Some(w.armed_at.elapsed().as_secs())),
        };
        RelayStatus {
            phase,
            last_outcome: slot.last_outcome,
            held_secs,
        }
    }

    /// Deadline callback. No-op unless the slot is still armed for the same
    /// generation — deliver racing this loses or wins atomically under the
    /// slot lock.
    async fn on_timeout(&self, generation: u64) {
        let mut slot = self.slot.lock().await;
        if slot.generation != generation {
            return;
        }
        let SlotState::Awaiting(waiting) = std::mem::replace(&mut slot.state, SlotState::Idle)
        else {
            return;
        };
        slot.generation += 1;
        slot.last_outcome = Some(SessionOutcome::Expired);
        tracing::info!(held = ?waiting.armed_at.elapsed(), "receive session expired");
        let _ = waiting.reply_tx.send(PollReply::TimedOut);
    }

    async fn take_awaiting(&self, outcome: SessionOutcome) -> Result<Awaiting, RelayError> {
        let mut slot = self.slot.lock().await;
        match std::mem::replace(&mut slot.state, SlotState::Idle) {
            SlotState::Awaiting(waiting) => {
                slot.generation += 1;
                slot.last_outcome = Some(outcome);
                Ok(waiting)
            }
            SlotState::Idle => Err(RelayError::NoActiveSession),
        }
    }
}

/// Percent-encode like `encodeURIComponent`: keep unreserved characters.
const FILE_URL_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'~');
