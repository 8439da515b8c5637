//! /api/text, /api/image, /api/client — content arriving from peers.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use clipway_services::{
    sanitize_filename, ContentEnvelope, ContentKind, Direction, FilePayload, LogRecord, LogStatus,
    UiEvent,
};

use super::{ApiMessage, ApiState};

fn default_device_name() -> String {
    "Device".to_string()
}

// ── /api/text ─────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct TextRequest {
    pub content: String,
    #[serde(default = "default_device_name")]
    pub device_name: String,
}

pub async fn handle_text(
    State(state): State<ApiState>,
    Json(req): Json<TextRequest>,
) -> (StatusCode, Json<ApiMessage>) {
    let envelope = ContentEnvelope::text(req.content.clone(), req.device_name.clone());

    let accepted = if state.confirmation_required {
        state.gate.request_confirmation(&envelope).await
    } else {
        true
    };

    if !accepted {
        record_log(
            &state,
            LogRecord {
                direction: Direction::Declined,
                device_name: req.device_name,
                content: req.content,
                content_type: ContentKind::Text,
                status: LogStatus::Declined,
                file_size: None,
                file_name: None,
            },
        )
        .await;
        return (
            StatusCode::OK,
            Json(ApiMessage::fail_with("Content declined by user")),
        );
    }

    tracing::info!(device = %req.device_name, len = req.content.len(), "text received");
    state.clipboard.write_text(&req.content).await;

    let is_link = req.content.starts_with("http://") || req.content.starts_with("https://");
    state.events.publish(UiEvent::TextReceived {
        content: req.content.clone(),
        device_name: req.device_name.clone(),
        is_link,
    });

    record_log(
        &state,
        LogRecord {
            direction: Direction::Received,
            device_name: req.device_name,
            content: req.content,
            content_type: ContentKind::Text,
            status: LogStatus::Success,
            file_size: None,
            file_name: None,
        },
    )
    .await;

    (StatusCode::OK, Json(ApiMessage::ok_with("Content accepted")))
}

// ── /api/image ────────────────────────────────────────────────────────────────

pub async fn handle_image(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> (StatusCode, Json<ApiMessage>) {
    let mut device_name = default_device_name();
    let mut file: Option<FilePayload> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiMessage::fail_with(e.to_string())),
                )
            }
        };

        if field.name() == Some("device_name") {
            match field.text().await {
                Ok(text) => device_name = text,
                Err(e) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(ApiMessage::fail_with(e.to_string())),
                    )
                }
            }
            continue;
        }

        let name = field
            .file_name()
            .map(sanitize_filename)
            .unwrap_or_else(|| "upload.bin".to_string());
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        match field.bytes().await {
            Ok(bytes) => {
                file = Some(FilePayload {
                    name,
                    mime_type,
                    bytes,
                })
            }
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiMessage::fail_with(e.to_string())),
                )
            }
        }
    }

    let Some(file) = file else {
        tracing::info!(device = %device_name, "upload carried no file");
        return (StatusCode::BAD_REQUEST, Json(ApiMessage::fail()));
    };

    if state.confirmation_required {
        let envelope = ContentEnvelope::file(file.clone(), device_name.clone());
        if !state.gate.request_confirmation(&envelope).await {
            record_log(
                &state,
                LogRecord {
                    direction: Direction::Declined,
                    device_name,
                    content: file.name.clone(),
                    content_type: ContentKind::File,
                    status: LogStatus::Declined,
                    file_size: Some(file.size()),
                    file_name: Some(file.name),
                },
            )
            .await;
            return (
                StatusCode::OK,
                Json(ApiMessage::fail_with("Content declined by user")),
            );
        }
    }

    let uploads = state.storage_root.join("uploads");
    let save_path = uploads.join(&file.name);
    let write = async {
        tokio::fs::create_dir_all(&uploads).await?;
        tokio::fs::write(&save_path, &file.bytes).await
    };
    if let Err(e) = write.await {
        tracing::error!(error = %e, path = %save_path.display(), "failed to persist upload");
        record_log(
            &state,
            LogRecord {
                direction: Direction::Received,
                device_name,
                content: file.name.clone(),
                content_type: ContentKind::File,
                status: LogStatus::Failed,
                file_size: Some(file.size()),
                file_name: Some(file.name),
            },
        )
        .await;
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiMessage::fail()));
    }

    tracing::info!(device = %device_name, file = %file.name, bytes = file.size(), "file received");
    state.events.publish(UiEvent::FileReceived {
        path: save_path,
        device_name: device_name.clone(),
    });
    record_log(
        &state,
        LogRecord {
            direction: Direction::Received,
            device_name,
            content: file.name.clone(),
            content_type: ContentKind::File,
            status: LogStatus::Success,
            file_size: Some(file.size()),
            file_name: Some(file.name),
        },
    )
    .await;

    (StatusCode::OK, Json(ApiMessage::ok()))
}

// ── /api/client ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ClientRequest {
    #[serde(default = "default_device_name")]
    pub device_name: String,
}

pub async fn handle_client(
    State(state): State<ApiState>,
    Json(req): Json<ClientRequest>,
) -> Json<ApiMessage> {
    tracing::info!(device = %req.device_name, "app open requested by device");
    state.events.publish(UiEvent::ClientOpened {
        device_name: req.device_name,
    });
    Json(ApiMessage::ok())
}

/// Content log writes never fail a request.
async fn record_log(state: &ApiState, record: LogRecord) {
    if let Err(e) = state.content_log.record(record).await {
        tracing::warn!(error = %e, "failed to append content log entry");
    }
}
