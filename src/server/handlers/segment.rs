use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    Error, Result,
    proxy::{BrowserHeaders, body_preview, client::SEGMENT_TIMEOUT},
    server::{params::ProxyParams, state::AppState},
};

/// Upstream headers mirrored onto the client response.
const MIRRORED_HEADERS: [header::HeaderName; 3] = [
    header::CONTENT_TYPE,
    header::CONTENT_RANGE,
    header::ACCEPT_RANGES,
];

/// Handle GET /_segment requests: stream an upstream resource to the client.
pub async fn handle_segment(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
    headers: HeaderMap,
) -> Response {
    let Some(url) = params.target() else {
        return with_cors((StatusCode::BAD_REQUEST, "missing u").into_response());
    };

    match proxy_segment(&state, url, &headers).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Segment proxy error for {}: {}", url, e);
            with_cors((StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response())
        }
    }
}

async fn proxy_segment(state: &AppState, url: &str, headers: &HeaderMap) -> Result<Response> {
    let range = headers.get(header::RANGE);
    tracing::info!(
        "Proxying segment {} (range={})",
        url,
        range.and_then(|r| r.to_str().ok()).unwrap_or("none")
    );

    let upstream_headers = BrowserHeaders::for_segment(&state.config.playlist_url, range);
    let upstream = state
        .client
        .open_stream(url, upstream_headers, SEGMENT_TIMEOUT)
        .await?;
    let status = upstream.status();

    if !status.is_success() {
        tracing::warn!("Segment upstream returned {} for {}", status, url);
        let preview = upstream.text().await.unwrap_or_default();
        let body = if preview.is_empty() {
            "upstream error".to_string()
        } else {
            preview.chars().take(1000).collect()
        };
        tracing::debug!("Segment upstream body: {}", body_preview(&body));
        return Ok(with_cors((status, body).into_response()));
    }

    let mut builder = Response::builder()
        .status(status)
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*");
    for name in MIRRORED_HEADERS {
        if let Some(value) = upstream.headers().get(&name) {
            builder = builder.header(name, value.clone());
        }
    }

    builder
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| Error::Internal(format!("building segment response: {}", e)))
}

fn with_cors(mut response: Response) -> Response {
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        header::HeaderValue::from_static("*"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{server::create_router, test_support::{config_with, spawn_upstream}};
    use axum::{Router, body::to_bytes, http::Request, routing::get};
    use tower::ServiceExt;

    async fn origin() -> String {
        spawn_upstream(
            Router::new()
                .route(
                    "/seg.ts",
                    get(|headers: HeaderMap| async move {
                        let range = headers
                            .get(header::RANGE)
                            .and_then(|r| r.to_str().ok())
                            .unwrap_or("none")
                            .to_string();
                        (
                            StatusCode::PARTIAL_CONTENT,
                            [
                                (header::CONTENT_TYPE, "video/mp2t"),
                                (header::CONTENT_RANGE, "bytes 0-3/100"),
                                (header::ACCEPT_RANGES, "bytes"),
                            ],
                            format!("range={}", range),
                        )
                    }),
                )
                .route("/gone.ts", get(|| async { (StatusCode::GONE, "") })),
        )
        .await
    }

    #[tokio::test]
    async fn test_segment_pass_through() {
        let base = origin().await;
        let app = create_router(AppState::new(config_with(&[])).unwrap());
        let uri = format!("/_segment?u={}", urlencoding::encode(&format!("{}/seg.ts", base)));

        let response = app
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header(header::RANGE, "bytes=0-3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "video/mp2t");
        assert_eq!(response.headers()[header::CONTENT_RANGE], "bytes 0-3/100");
        assert_eq!(response.headers()[header::ACCEPT_RANGES], "bytes");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"range=bytes=0-3");
    }

    #[tokio::test]
    async fn test_segment_upstream_error_status_is_mirrored() {
        let base = origin().await;
        let app = create_router(AppState::new(config_with(&[])).unwrap());
        let uri = format!("/_segment?u={}", urlencoding::encode(&format!("{}/gone.ts", base)));

        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GONE);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"upstream error");
    }

    #[tokio::test]
    async fn test_segment_requires_target() {
        let app = create_router(AppState::new(config_with(&[])).unwrap());
        let response = app
            .oneshot(Request::builder().uri("/_segment").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
