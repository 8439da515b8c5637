//! /api/files/{filename} — serves previously relayed files.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use clipway_services::sanitize_filename;

use super::{ApiMessage, ApiState};

pub async fn handle_file(
    State(state): State<ApiState>,
    Path(filename): Path<String>,
) -> Response {
    // Same sanitizer the writer used, so a crafted name can only miss.
    let safe = sanitize_filename(&filename);
    let path = state.storage_root.join("shareables").join(&safe);

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&safe).first_or_octet_stream();
            tracing::debug!(file = %safe, bytes = bytes.len(), "serving shared file");
            ([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => (
            StatusCode::NOT_FOUND,
            Json(ApiMessage::fail_with("File not found")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, file = %safe, "failed to read shared file");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiMessage::fail())).into_response()
        }
    }
}
