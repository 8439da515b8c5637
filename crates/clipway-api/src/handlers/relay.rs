//! /api, /api/poll, /api/content — liveness and the rendezvous endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use clipway_services::{PollReply, RelayError};

use super::{ApiMessage, ApiState};

// ── /api ──────────────────────────────────────────────────────────────────────

pub async fn handle_liveness() -> Json<ApiMessage> {
    Json(ApiMessage::ok())
}

// ── /api/poll ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct PollContentResponse {
    content: String,
    #[serde(rename = "urlScheme", skip_serializing_if = "Option::is_none")]
    url_scheme: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PollFileResponse {
    success: bool,
    file_url: String,
    file_name: String,
    file_type: String,
    file_size: u64,
}

/// Arm the receive slot and hold the connection until content arrives or
/// the deadline expires.
pub async fn handle_poll(State(state): State<ApiState>) -> Response {
    let reply_rx = match state.relay.begin_wait().await {
        Ok(rx) => rx,
        Err(e) => {
            tracing::debug!(error = %e, "poll rejected");
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiMessage::fail_with(e.to_string())),
            )
                .into_response();
        }
    };

    match reply_rx.await {
        Ok(PollReply::Content {
            content,
            url_scheme,
        }) => Json(PollContentResponse {
            content,
            url_scheme,
        })
        .into_response(),
        Ok(PollReply::File {
            file_url,
            file_name,
            file_type,
            file_size,
        }) => Json(PollFileResponse {
            success: true,
            file_url,
            file_name,
            file_type,
            file_size,
        })
        .into_response(),
        Ok(PollReply::TimedOut) | Ok(PollReply::Cancelled) | Err(_) => {
            (StatusCode::BAD_REQUEST, Json(ApiMessage::fail())).into_response()
        }
    }
}

// ── /api/content ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ContentRequest {
    pub content: String,
}

pub async fn handle_content(
    State(state): State<ApiState>,
    Json(req): Json<ContentRequest>,
) -> (StatusCode, Json<ApiMessage>) {
    match state.relay.deliver(req.content).await {
        Ok(()) => (StatusCode::OK, Json(ApiMessage::ok())),
        Err(RelayError::NoActiveSession) => (
            StatusCode::BAD_REQUEST,
            Json(ApiMessage::fail_with("No current session found")),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "content delivery failed");
            (
                StatusCode::BAD_REQUEST,
                Json(ApiMessage::fail_with(e.to_string())),
            )
        }
    }
}
