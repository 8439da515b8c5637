//! /control — the host-shell-facing surface. Uniform envelope
//! `{success, message, data?}` on every route.

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clipway_services::{
    ContentKind, Direction, FilePayload, LogEntry, LogFilter, LogRecord, LogStatus, RelayError,
    RelayStatus, Settings,
};

use super::ApiState;

#[derive(Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: "Success".to_string(),
            data: Some(data),
        })
    }

    fn ok_empty(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: None,
        })
    }

    fn fail(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            message: message.into(),
            data: None,
        })
    }
}

// ── /control/servers ──────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub id: Uuid,
    pub ip: String,
    pub port: u16,
    pub device_name: String,
    pub last_seen_secs: u64,
}

pub async fn handle_servers(State(state): State<ApiState>) -> Json<Envelope<Vec<ServerInfo>>> {
    let servers = state
        .catalog
        .active()
        .into_iter()
        .map(|node| ServerInfo {
            id: node.identity,
            ip: node.ip.to_string(),
            port: node.port,
            device_name: node.device_name,
            last_seen_secs: node.last_seen.elapsed().as_secs(),
        })
        .collect();
    Envelope::ok(servers)
}

// ── /control/settings ─────────────────────────────────────────────────────────

pub async fn handle_get_settings(State(state): State<ApiState>) -> Json<Envelope<Settings>> {
    Envelope::ok(state.settings.current().await)
}

pub async fn handle_update_settings(
    State(state): State<ApiState>,
    Json(settings): Json<Settings>,
) -> Json<Envelope<()>> {
    state.settings.update(settings).await;
    Envelope::ok_empty("Success")
}

// ── /control/clipboard ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ClipboardRequest {
    pub text: String,
}

pub async fn handle_clipboard(
    State(state): State<ApiState>,
    Json(req): Json<ClipboardRequest>,
) -> Json<Envelope<()>> {
    state.clipboard.write_text(&req.text).await;
    Envelope::ok_empty("Success")
}

// ── /control/respond-content ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RespondContentRequest {
    pub content: String,
}

pub async fn handle_respond_content(
    State(state): State<ApiState>,
    Json(req): Json<RespondContentRequest>,
) -> Json<Envelope<()>> {
    let content = req.content.clone();
    match state.relay.deliver(req.content).await {
        Ok(()) => {
            record_sent(&state, content, ContentKind::Text, None, None).await;
            Envelope::ok_empty("Success")
        }
        Err(RelayError::NoActiveSession) => Envelope::fail("No current session found"),
        Err(e) => Envelope::fail(e.to_string()),
    }
}

// ── /control/respond-file ─────────────────────────────────────────────────────

pub async fn handle_respond_file(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Json<Envelope<()>> {
    let mut file: Option<FilePayload> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Envelope::fail(e.to_string()),
        };
        let name = field
            .file_name()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "shared_file".to_string());
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
            Err(e) => return Envelope::fail(e.to_string()),
        }
    }

    let Some(file) = file else {
        return Envelope::fail("no file provided");
    };

    let (name, size) = (file.name.clone(), file.size());
    match state.relay.deliver_file(file, &state.storage_root).await {
        Ok(()) => {
            record_sent(&state, name.clone(), ContentKind::File, Some(size), Some(name)).await;
            Envelope::ok_empty("Success")
        }
        Err(RelayError::NoActiveSession) => Envelope::fail("No current session found"),
        Err(e) => {
            tracing::error!(error = %e, "file response failed");
            Envelope::fail(e.to_string())
        }
    }
}

// ── /control/send ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendRequest {
    pub ip: String,
    pub port: u16,
    pub content: String,
}

#[derive(Deserialize)]
struct PeerTextResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Forward content to another node's `/api/text`.
pub async fn handle_send(
    State(state): State<ApiState>,
    Json(req): Json<SendRequest>,
) -> Json<Envelope<()>> {
    let url = format!("http://{}:{}/api/text", req.ip, req.port);
    tracing::info!(%url, "sending content to peer server");

    let response = reqwest::Client::new()
        .post(&url)
        .json(&serde_json::json!({
            "content": req.content.clone(),
            "device_name": state.device_name.clone(),
        }))
        .timeout(std::time::Duration::from_secs(10))
        .send()
        .await;

    let outcome = match response {
        Ok(resp) => match resp.json::<PeerTextResponse>().await {
            Ok(body) if body.success => Ok(()),
            Ok(body) => Err(body
                .message
                .unwrap_or_else(|| "peer rejected the content".to_string())),
            Err(e) => Err(format!("unexpected response from peer: {e}")),
        },
        Err(e) => Err(format!("failed to reach peer: {e}")),
    };

    let status = if outcome.is_ok() {
        LogStatus::Success
    } else {
        LogStatus::Failed
    };
    let record = LogRecord {
        direction: Direction::Sent,
        device_name: req.ip.clone(),
        content: req.content,
        content_type: ContentKind::Text,
        status,
        file_size: None,
        file_name: None,
    };
    if let Err(e) = state.content_log.record(record).await {
        tracing::warn!(error = %e, "failed to append content log entry");
    }

    match outcome {
        Ok(()) => Envelope::ok_empty("Success"),
        Err(message) => Envelope::fail(message),
    }
}

// ── /control/confirmations/{id} ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ConfirmationDecision {
    pub accepted: bool,
}

pub async fn handle_confirmation(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ConfirmationDecision>,
) -> Json<Envelope<()>> {
    match state.gate.respond(id, req.accepted) {
        Ok(()) => Envelope::ok_empty("Response recorded"),
        Err(e) => Envelope::fail(e.to_string()),
    }
}

// ── /control/logs ─────────────────────────────────────────────────────────────

pub async fn handle_logs(
    State(state): State<ApiState>,
    Query(filter): Query<LogFilter>,
) -> Json<Envelope<Vec<LogEntry>>> {
    match state.content_log.recent(filter).await {
        Ok(entries) => Envelope::ok(entries),
        Err(e) => {
            tracing::error!(error = %e, "content log query failed");
            Envelope::fail("Failed to get logs")
        }
    }
}

pub async fn handle_logs_count(
    State(state): State<ApiState>,
    Query(filter): Query<LogFilter>,
) -> Json<Envelope<u64>> {
    match state.content_log.count(filter).await {
        Ok(count) => Envelope::ok(count),
        Err(e) => {
            tracing::error!(error = %e, "content log count failed");
            Envelope::fail("Failed to get logs count")
        }
    }
}

pub async fn handle_logs_clear(State(state): State<ApiState>) -> Json<Envelope<u64>> {
    match state.content_log.clear().await {
        Ok(cleared) => {
            tracing::info!(cleared, "content log cleared via control surface");
            Envelope::ok(cleared)
        }
        Err(e) => {
            tracing::error!(error = %e, "content log clear failed");
            Envelope::fail("Failed to clear logs")
        }
    }
}

// ── /control/status ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusData {
    pub device_name: String,
    pub relay: RelayStatus,
    pub active_servers: usize,
    pub tracked_servers: usize,
    pub pending_confirmations: usize,
}

pub async fn handle_status(State(state): State<ApiState>) -> Json<Envelope<StatusData>> {
    Envelope::ok(StatusData {
        device_name: state.device_name.clone(),
        relay: state.relay.status().await,
        active_servers: state.catalog.active().len(),
        tracked_servers: state.catalog.tracked(),
        pending_confirmations: state.gate.pending_count(),
    })
}

async fn record_sent(
    state: &ApiState,
    content: String,
    content_type: ContentKind,
    file_size: Option<u64>,
    file_name: Option<String>,
) {
    let record = LogRecord {
        direction: Direction::Sent,
        device_name: "local".to_string(),
        content,
        content_type,
        status: LogStatus::Success,
        file_size,
        file_name,
    };
    if let Err(e) = state.content_log.record(record).await {
        tracing::warn!(error = %e, "failed to append content log entry");
    }
}
