use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::server::state::AppState;

/// Handle GET /_health.
pub async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Handle POST /_refresh-playlist. Fetches the primary catalog live; the TTL
/// caches are left alone.
pub async fn handle_refresh_playlist(State(state): State<AppState>) -> impl IntoResponse {
    tracing::info!("Manual playlist refresh requested");
    match state.sources.fetch_playlist().await {
        Ok(playlist) => (
            StatusCode::OK,
            Json(json!({ "ok": true, "channels": playlist.channels.len() })),
        ),
        Err(e) => {
            tracing::error!("Manual playlist refresh failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": e.public_message() })),
            )
        }
    }
}
