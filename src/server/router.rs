use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{
    handlers::{
        handle_bdix, handle_channel, handle_direct, handle_health, handle_manifest,
        handle_nvision, handle_refresh_playlist, handle_segment,
    },
    state::AppState,
};

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let channel_route = format!("/{}/ch_no/{{number}}", state.config.route_prefix);

    Router::new()
        .route(&channel_route, get(handle_channel))
        .route("/all/{*target}", get(handle_direct))
        .route("/nvision/{xui_id}", get(handle_nvision))
        .route("/bdix/{number}", get(handle_bdix))
        .route("/_health", get(handle_health))
        .route("/_refresh-playlist", post(handle_refresh_playlist))
        .route("/_segment", get(handle_segment))
        .route("/_m3u", get(handle_manifest))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
