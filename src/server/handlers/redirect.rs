use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    Error, Result,
    gate::RoutePolicy,
    server::{params::GateParams, state::AppState},
};

use super::found;

/// Parse a channel number from a path segment. Any finite number is accepted;
/// fractional numbers simply match no channel.
pub fn parse_channel_number(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| Error::InvalidChannelNumber(raw.to_string()))
}

/// Handle GET /{prefix}/ch_no/{number}.
pub async fn handle_channel(
    State(state): State<AppState>,
    Path(number): Path<String>,
    Query(params): Query<GateParams>,
) -> Result<Response> {
    let number = parse_channel_number(&number)?;
    let plan = RoutePolicy::Open.plan(params.manifest_mode(), params.subscriber())?;
    tracing::info!(
        "Channel request #{} m3u={:?} subscriber={:?}",
        number,
        params.m3u,
        params.subscriber()
    );

    let stream_url = state.resolver.by_number(number).await?;
    let target = state.gate.target(&plan, &stream_url).await;
    Ok(found(&target))
}

/// Handle GET /all/{*target} where the path ends in `/direct`.
pub async fn handle_direct(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(params): Query<GateParams>,
) -> Result<Response> {
    let raw_target = if path == "direct" {
        ""
    } else {
        match path.strip_suffix("/direct") {
            Some(target) => target,
            None => return Ok(StatusCode::NOT_FOUND.into_response()),
        }
    };
    if raw_target.is_empty() {
        return Err(Error::MissingTarget);
    }

    // The router already percent-decoded the path once; targets arrive encoded
    // as a whole, so decode again and fall back to the raw value.
    let target = urlencoding::decode(raw_target)
        .map(|t| t.into_owned())
        .unwrap_or_else(|_| raw_target.to_string());

    let plan = RoutePolicy::SubscriberWithManifest.plan(params.manifest_mode(), params.subscriber())?;
    tracing::info!(
        "Direct request target={:?} subscriber={} m3u={:?}",
        target,
        params.subscriber().unwrap_or("none"),
        params.m3u
    );

    let target = state.gate.target(&plan, &target).await;
    Ok(found(&target))
}

/// Handle GET /nvision/{xui_id}.
pub async fn handle_nvision(
    State(state): State<AppState>,
    Path(xui_id): Path<String>,
    Query(params): Query<GateParams>,
) -> Result<Response> {
    let plan = RoutePolicy::ManifestAndSubscriberRequired
        .plan(params.manifest_mode(), params.subscriber())?;
    tracing::info!(
        "Nvision request xui-id={} subscriber={:?}",
        xui_id,
        params.subscriber()
    );

    let stream_url = state.resolver.by_xui_id(&xui_id).await?;
    let target = state.gate.target(&plan, &stream_url).await;
    Ok(found(&target))
}

/// Handle GET /bdix/{number}.
pub async fn handle_bdix(
    State(state): State<AppState>,
    Path(number): Path<String>,
    Query(params): Query<GateParams>,
) -> Result<Response> {
    let number = parse_channel_number(&number)?;
    let plan = RoutePolicy::SubscriberRequired.plan(params.manifest_mode(), params.subscriber())?;
    tracing::info!(
        "Bdix request #{} subscriber={:?}",
        number,
        params.subscriber()
    );

    let stream_url = state.resolver.by_bdix_number(number).await?;
    let target = state.gate.target(&plan, &stream_url).await;
    Ok(found(&target))
}
