use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::server::{params::ProxyParams, state::AppState};

/// Handle GET /_m3u requests.
pub async fn handle_manifest(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
) -> Response {
    let Some(source_url) = params.target() else {
        return (StatusCode::BAD_REQUEST, "missing u").into_response();
    };

    match state.manifests.render(source_url).await {
        Ok(outcome) => outcome.into_response(),
        Err(e) => e.into_response(),
    }
}
