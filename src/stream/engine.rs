use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use url::Url;

use crate::{
    Error, FallbackMode, Result,
    proxy::{ManifestFetch, ProxyClient},
};

use super::{
    processor::StreamProcessor,
    wrapper::{is_direct_video, wrapper_manifest},
};

pub const HLS_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";

/// What the manifest endpoint sends back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestOutcome {
    /// Manifest text (rewritten, or a wrapper).
    Manifest(String),
    /// Redirect the client to fetch the source itself.
    Redirect(String),
}

impl IntoResponse for ManifestOutcome {
    fn into_response(self) -> Response {
        match self {
            Self::Manifest(body) => (
                [
                    (header::CONTENT_TYPE, HLS_CONTENT_TYPE),
                    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                ],
                body,
            )
                .into_response(),
            Self::Redirect(location) => (
                StatusCode::FOUND,
                [
                    (header::LOCATION, location.as_str()),
                    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                ],
            )
                .into_response(),
        }
    }
}

/// Fetches manifests, rewrites their URIs, and falls back when the origin refuses.
pub struct ManifestEngine {
    client: ProxyClient,
    /// Sent as `Referer` on the retry.
    referer: String,
    proxy_segments: bool,
    fallback: FallbackMode,
}

impl ManifestEngine {
    pub fn new(
        client: ProxyClient,
        referer: impl Into<String>,
        proxy_segments: bool,
        fallback: FallbackMode,
    ) -> Self {
        Self {
            client,
            referer: referer.into(),
            proxy_segments,
            fallback,
        }
    }

    pub async fn render(&self, source_url: &str) -> Result<ManifestOutcome> {
        tracing::info!("Fetching source playlist/content: {}", source_url);

        if is_direct_video(source_url) {
            tracing::info!("Source is mp4; returning wrapper manifest");
            return Ok(ManifestOutcome::Manifest(wrapper_manifest(source_url)));
        }

        let base = Url::parse(source_url)?;

        let fetched = self
            .client
            .fetch_manifest(source_url, &self.referer)
            .await
            .map_err(|e| Error::Internal(format!("reading manifest {}: {}", source_url, e)))?;

        match fetched {
            ManifestFetch::Fetched(text) => {
                let (rewritten, stats) = StreamProcessor::new(base, self.proxy_segments)
                    .process_with_stats(&text);
                tracing::info!("Returning rewritten playlist for {} ({:?})", source_url, stats);
                tracing::debug!("Rewritten manifest:\n{}", rewritten);
                Ok(ManifestOutcome::Manifest(rewritten))
            }
            ManifestFetch::Failed { reason, preview } => {
                tracing::error!(
                    "Upstream not ok after retry: {} ({}) preview={}",
                    source_url,
                    reason,
                    preview
                );
                Ok(self.fallback(source_url))
            }
        }
    }

    fn fallback(&self, source_url: &str) -> ManifestOutcome {
        match self.fallback {
            FallbackMode::Redirect => {
                tracing::warn!("Falling back to redirect to {}", source_url);
                ManifestOutcome::Redirect(source_url.to_string())
            }
            FallbackMode::Wrapper => {
                tracing::warn!("Falling back to wrapper manifest pointing at {}", source_url);
                ManifestOutcome::Manifest(wrapper_manifest(source_url))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_upstream;
    use axum::{Router, routing::get};
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    fn engine(proxy_segments: bool, fallback: FallbackMode) -> ManifestEngine {
        ManifestEngine::new(
            ProxyClient::new().unwrap(),
            "https://catalog.example/playlist.json",
            proxy_segments,
            fallback,
        )
    }

    async fn failing_origin() -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let base = spawn_upstream(Router::new().route(
            "/live/index.m3u8",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::FORBIDDEN, "forbidden")
                }
            }),
        ))
        .await;
        (format!("{}/live/index.m3u8", base), hits)
    }

    #[tokio::test]
    async fn test_mp4_source_is_wrapped_without_fetching() {
        let source = "http://127.0.0.1:1/never/fetched.mp4";
        let outcome = engine(true, FallbackMode::Redirect).render(source).await.unwrap();

        assert_eq!(
            outcome,
            ManifestOutcome::Manifest(format!("#EXTM3U\n#EXTINF:-1,\n{}", source))
        );
    }

    #[tokio::test]
    async fn test_double_failure_with_wrapper_mode() {
        let (source, hits) = failing_origin().await;
        let outcome = engine(false, FallbackMode::Wrapper).render(&source).await.unwrap();

        assert_eq!(outcome, ManifestOutcome::Manifest(wrapper_manifest(&source)));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_double_failure_with_redirect_mode() {
        let (source, hits) = failing_origin().await;
        let outcome = engine(false, FallbackMode::Redirect).render(&source).await.unwrap();

        assert_eq!(outcome, ManifestOutcome::Redirect(source.clone()));
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        let response = outcome.into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], source.as_str());
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_unreachable_origin_falls_back() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let source = format!("http://{}/live/index.m3u8", addr);

        let wrapped = engine(false, FallbackMode::Wrapper).render(&source).await.unwrap();
        assert_eq!(wrapped, ManifestOutcome::Manifest(wrapper_manifest(&source)));

        let redirected = engine(false, FallbackMode::Redirect).render(&source).await.unwrap();
        assert_eq!(redirected, ManifestOutcome::Redirect(source));
    }

    #[tokio::test]
    async fn test_successful_fetch_is_rewritten() {
        let base = spawn_upstream(Router::new().route(
            "/path/index.m3u8",
            get(|| async { "#EXTM3U\n#EXTINF:4,\nseg1.ts\n#EXT-X-ENDLIST" }),
        ))
        .await;
        let source = format!("{}/path/index.m3u8", base);

        let plain = engine(false, FallbackMode::Wrapper).render(&source).await.unwrap();
        assert_eq!(
            plain,
            ManifestOutcome::Manifest(format!(
                "#EXTM3U\n#EXTINF:4,\n{}/path/seg1.ts\n#EXT-X-ENDLIST",
                base
            ))
        );

        let proxied = engine(true, FallbackMode::Wrapper).render(&source).await.unwrap();
        let expected = format!(
            "/_segment?u={}",
            urlencoding::encode(&format!("{}/path/seg1.ts", base))
        );
        match proxied {
            ManifestOutcome::Manifest(body) => assert_eq!(body.lines().nth(2), Some(expected.as_str())),
            other => panic!("expected manifest, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_source_url() {
        let err = engine(false, FallbackMode::Wrapper)
            .render("not a url")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_manifest_response_headers() {
        let response = ManifestOutcome::Manifest("#EXTM3U".into()).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], HLS_CONTENT_TYPE);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
