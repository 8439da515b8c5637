//! Notification forwarder.
//!
//! Consumes the UI event bus and renders events as user-facing log lines.
//! A desktop shell subscribing to the same bus shows real notifications;
//! the daemon itself stays headless.

use tokio::sync::broadcast;

use clipway_services::UiEvent;

pub async fn forward_events(mut rx: broadcast::Receiver<UiEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => render(event),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "notification stream lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn render(event: UiEvent) {
    match event {
        UiEvent::TextReceived {
            content,
            device_name,
            is_link,
        } => {
            tracing::info!(device = %device_name, len = content.len(), is_link, "new content received");
        }
        UiEvent::ContentDelivered { url_scheme, .. } => {
            tracing::info!(
                url_scheme = url_scheme.as_deref().unwrap_or("-"),
                "content delivered to device"
            );
        }
        UiEvent::FileReceived { path, device_name } => {
            tracing::info!(device = %device_name, path = %path.display(), "file received");
        }
        UiEvent::ConfirmationRequested {
            id,
            device_name,
            content_preview,
            kind,
        } => {
            tracing::info!(
                %id,
                device = %device_name,
                kind = kind.as_str(),
                preview = %content_preview,
                "confirmation needed"
            );
        }
        UiEvent::ClientOpened { device_name } => {
            tracing::info!(device = %device_name, "opened by device");
        }
        UiEvent::ClipboardWritten { text } => {
            tracing::info!(len = text.len(), "clipboard updated");
        }
    }
}
