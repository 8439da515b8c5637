//! Confirmation gate — a human accept/decline decision between "content
//! arrived" and "content is applied".
//!
//! Each inbound item registers a pending entry keyed by a fresh id and the
//! caller awaits the decision. Resolving removes the entry, so a second
//! answer for the same id has nothing to resolve. An unanswered request
//! declines itself after a bounded window — shorter than the relay deadline,
//! so the HTTP layer never waits on a decision that outlives its connection.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::content::ContentEnvelope;
use crate::events::{UiEvent, UiEventBus};

#[derive(Debug, thiserror::Error)]
pub enum ConfirmError {
    #[error("no pending confirmation with that id")]
    UnknownOrResolved,
}

struct Pending {
    decision_tx: oneshot::Sender<bool>,
    created_at: Instant,
}

#[derive(Clone)]
pub struct ConfirmationGate {
    pending: Arc<DashMap<Uuid, Pending>>,
    timeout: Duration,
    events: UiEventBus,
}

impl ConfirmationGate {
    pub fn new(timeout: Duration, events: UiEventBus) -> Self {
        Self {
            pending: Arc::new(DashMap::new()),
            timeout,
            events,
        }
    }

    /// Register the request, surface it to the shell, and wait for the
    /// decision. Returns whether the content was accepted; timeout and a
    /// vanished resolver both count as declined.
    pub async fn request_confirmation(&self, envelope: &ContentEnvelope) -> bool {
        let id = Uuid::new_v4();
        let (decision_tx, decision_rx) = oneshot::channel();
        self.pending.insert(
            id,
            Pending {
                decision_tx,
                created_at: Instant::now(),
            },
        );

        self.events.publish(UiEvent::ConfirmationRequested {
            id,
            device_name: envelope.origin_device_name.clone(),
            content_preview: envelope.preview(),
            kind: envelope.kind(),
        });
        tracing::info!(
            %id,
            device = %envelope.origin_device_name,
            kind = envelope.kind().as_str(),
            "confirmation requested"
        );

        match tokio::time::timeout(self.timeout, decision_rx).await {
            Ok(Ok(accepted)) => accepted,
            Ok(Err(_)) => false,
            Err(_) => {
                self.pending.remove(&id);
                tracing::info!(%id, "confirmation unanswered, auto-declining");
                false
            }
        }
    }

    /// Resolve a pending request. Exactly once: the entry is removed as it
    /// is answered, and answering again is an error.
    pub fn respond(&self, id: Uuid, accepted: bool) -> Result<(), ConfirmError> {
        let (_, pending) = self
            .pending
            .remove(&id)
            .ok_or(ConfirmError::UnknownOrResolved)?;
        tracing::info!(
            %id,
            accepted,
            waited = ?pending.created_at.elapsed(),
            "confirmation resolved"
        );
        let _ = pending.decision_tx.send(accepted);
        Ok(())
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
