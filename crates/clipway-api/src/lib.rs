pub mod handlers;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub use handlers::ApiState;

/// Maximum inbound upload size (64 MB).
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Routes peers on the LAN call.
pub fn peer_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api", get(handlers::relay::handle_liveness))
        .route("/api/poll", get(handlers::relay::handle_poll))
        .route("/api/text", post(handlers::inbound::handle_text))
        .route("/api/content", post(handlers::relay::handle_content))
        .route(
            "/api/image",
            post(handlers::inbound::handle_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/files/{filename}", get(handlers::files::handle_file))
        .route("/api/client", post(handlers::inbound::handle_client))
        .with_state(state)
        .layer(cors)
}

/// Routes the host shell calls. Bind this to loopback only.
pub fn control_router(state: ApiState) -> Router {
    Router::new()
        .route("/control/servers", get(handlers::control::handle_servers))
        .route(
            "/control/settings",
            get(handlers::control::handle_get_settings)
                .post(handlers::control::handle_update_settings),
        )
        .route(
            "/control/clipboard",
            post(handlers::control::handle_clipboard),
        )
        .route(
            "/control/respond-content",
            post(handlers::control::handle_respond_content),
        )
        .route(
            "/control/respond-file",
            post(handlers::control::handle_respond_file)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/control/send", post(handlers::control::handle_send))
        .route(
            "/control/confirmations/{id}",
            post(handlers::control::handle_confirmation),
        )
        .route("/control/logs", get(handlers::control::handle_logs))
        .route(
            "/control/logs/count",
            get(handlers::control::handle_logs_count),
        )
        .route(
            "/control/logs/clear",
            post(handlers::control::handle_logs_clear),
        )
        .route("/control/status", get(handlers::control::handle_status))
        .with_state(state)
}

pub async fn serve_peer(state: ApiState, listener: TcpListener) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "peer API listening");
    axum::serve(listener, peer_router(state)).await?;
    Ok(())
}

pub async fn serve_control(state: ApiState, listener: TcpListener) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "control surface listening");
    axum::serve(listener, control_router(state)).await?;
    Ok(())
}
