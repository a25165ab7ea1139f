use crate::{Error, Result};
use reqwest::{Client, Response, header::HeaderMap};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::headers::{BrowserHeaders, HLS_ACCEPT};

pub const CATALOG_TIMEOUT: Duration = Duration::from_secs(10);
pub const MANIFEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const SUBSCRIPTION_TIMEOUT: Duration = Duration::from_secs(8);
pub const SEGMENT_TIMEOUT: Duration = Duration::from_secs(20);

const PREVIEW_CHARS: usize = 1000;

/// Outcome of fetching an upstream manifest, retry included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestFetch {
    Fetched(String),
    /// Both attempts failed; `reason` and `preview` are for logging only.
    Failed { reason: String, preview: String },
}

/// HTTP client for talking to catalogs, the subscription service and stream origins.
#[derive(Clone)]
pub struct ProxyClient {
    client: Client,
}

impl ProxyClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Send a GET without checking the status.
    pub async fn get(
        &self,
        url: &str,
        headers: Option<HeaderMap>,
        timeout: Duration,
    ) -> Result<Response> {
        let mut request = self.client.get(url).timeout(timeout);
        if let Some(headers) = headers {
            request = request.headers(headers);
        }
        Ok(request.send().await?)
    }

    /// Send a GET whose response headers must arrive within `timeout`. The body
    /// is not covered, so long streams are never cut off.
    pub async fn open_stream(
        &self,
        url: &str,
        headers: HeaderMap,
        timeout: Duration,
    ) -> Result<Response> {
        let request = self.client.get(url).headers(headers).send();
        match tokio::time::timeout(timeout, request).await {
            Ok(response) => Ok(response?),
            Err(_) => Err(Error::FetchTimeout(url.to_string())),
        }
    }

    /// GET a URL, requiring a success status, and return the body as text.
    pub async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String> {
        let response = self.get(url, None, timeout).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::FetchFailed {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }
        Ok(response.text().await?)
    }

    /// GET a URL, requiring a success status, and parse the body as JSON.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str, timeout: Duration) -> Result<T> {
        let text = self.fetch_text(url, timeout).await?;
        serde_json::from_str(&text).map_err(|e| Error::InvalidCatalog {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Fetch a manifest, retrying once with browser-like headers when the
    /// first attempt fails. Only a failure to read a successful body is an error.
    pub async fn fetch_manifest(&self, url: &str, referer: &str) -> Result<ManifestFetch> {
        let response = match self.get(url, None, MANIFEST_TIMEOUT).await {
            Ok(response) if response.status().is_success() => response,
            first => {
                match first {
                    Ok(response) => tracing::warn!(
                        "Upstream returned {} for {} - attempting retry with browser headers",
                        response.status(),
                        url
                    ),
                    Err(e) => tracing::warn!(
                        "Upstream fetch failed for {}: {} - attempting retry with browser headers",
                        url,
                        e
                    ),
                }

                let headers = BrowserHeaders::build(HLS_ACCEPT, referer);
                match self.get(url, Some(headers), MANIFEST_TIMEOUT).await {
                    Ok(response) if response.status().is_success() => response,
                    Ok(response) => {
                        let reason = format!("HTTP {}", response.status());
                        let body = response.text().await.unwrap_or_default();
                        return Ok(ManifestFetch::Failed {
                            reason,
                            preview: body_preview(&body),
                        });
                    }
                    Err(e) => {
                        return Ok(ManifestFetch::Failed {
                            reason: e.to_string(),
                            preview: String::new(),
                        });
                    }
                }
            }
        };

        Ok(ManifestFetch::Fetched(response.text().await?))
    }
}

/// First 1000 characters of `text` with whitespace runs collapsed, for logs.
pub fn body_preview(text: &str) -> String {
    let mut preview = text
        .chars()
        .take(PREVIEW_CHARS)
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if text.chars().nth(PREVIEW_CHARS).is_some() {
        preview.push_str("...[truncated]");
    }
    preview
}
