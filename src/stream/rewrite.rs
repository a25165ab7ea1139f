use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use super::classifier::{LineClassifier, LineType};

static SCHEME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://").expect("valid scheme pattern"));

pub const SEGMENT_ENDPOINT: &str = "/_segment";
pub const MANIFEST_ENDPOINT: &str = "/_m3u";

/// Result of rewriting one manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewrittenLine {
    /// Tags, comments, blank lines, and URIs that could not be resolved.
    Unchanged(String),
    /// Resolved against the manifest URL.
    Absolute(String),
    /// Routed through the segment pass-through endpoint.
    ProxiedSegment(String),
    /// Routed back through the manifest endpoint for recursive rewriting.
    ProxiedManifest(String),
}

impl RewrittenLine {
    pub fn into_string(self) -> String {
        match self {
            Self::Unchanged(s)
            | Self::Absolute(s)
            | Self::ProxiedSegment(s)
            | Self::ProxiedManifest(s) => s,
        }
    }
}

/// Whether `uri` already carries a `scheme://` prefix.
pub fn is_absolute(uri: &str) -> bool {
    SCHEME_PREFIX.is_match(uri)
}

/// Rewrite a single manifest line relative to the manifest at `base`.
pub fn rewrite_line(line: &str, base: &Url, proxy_segments: bool) -> RewrittenLine {
    if LineClassifier::classify(line) != LineType::Uri {
        return RewrittenLine::Unchanged(line.to_string());
    }

    let uri = line.trim();
    let absolute = if is_absolute(uri) {
        uri.to_string()
    } else {
        match base.join(uri) {
            Ok(resolved) => resolved.to_string(),
            Err(e) => {
                tracing::debug!("Leaving unresolvable URI {:?} as-is: {}", uri, e);
                return RewrittenLine::Unchanged(line.to_string());
            }
        }
    };

    if !proxy_segments {
        return RewrittenLine::Absolute(absolute);
    }

    if absolute.to_lowercase().contains(".m3u8") {
        RewrittenLine::ProxiedManifest(proxy_path(MANIFEST_ENDPOINT, &absolute))
    } else {
        RewrittenLine::ProxiedSegment(proxy_path(SEGMENT_ENDPOINT, &absolute))
    }
}

/// `<endpoint>?u=<percent-encoded target>`
pub fn proxy_path(endpoint: &str, target: &str) -> String {
    format!("{}?u={}", endpoint, urlencoding::encode(target))
}
