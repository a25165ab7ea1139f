//! Runtime configuration read from environment variables.
//!
//! Every setting has a default so the service starts with an empty
//! environment; the two optional catalogs stay disabled until their URL is set.

use std::time::Duration;

pub const DEFAULT_PLAYLIST_URL: &str =
    "https://raw.githubusercontent.com/devmujahidul/MeowZone/refs/heads/main/playlist.json";
pub const DEFAULT_SUBSCRIPTION_URL_TEMPLATE: &str =
    "https://backend.bdstream.site/api/smarttv/subscription-status/{id}";
pub const DEFAULT_EXPIRED_VIDEO_URL: &str = "http://bdstream.site/playback_video/fall.mp4";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CACHE_TTL_SECONDS: f64 = 60.0;
pub const DEFAULT_ROUTE_PREFIX: &str = "rz";

/// What the manifest proxy does when the upstream manifest cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackMode {
    /// Redirect the client straight to the source URL.
    Redirect,
    /// Serve a one-entry manifest pointing at the source URL.
    #[default]
    Wrapper,
}

impl FallbackMode {
    /// Unknown or missing values select [`FallbackMode::Wrapper`].
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("redirect") => Self::Redirect,
            Some("wrapper") => Self::Wrapper,
            Some(other) => {
                tracing::warn!("Unknown PROXY_FALLBACK_MODE {:?}, using wrapper", other);
                Self::Wrapper
            }
            None => Self::Wrapper,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Primary channel catalog (JSON, never cached).
    pub playlist_url: String,
    /// Subscription status endpoint containing an `{id}` placeholder.
    pub subscription_url_template: String,
    /// Stream served to subscribers whose subscription is inactive.
    pub expired_video_url: String,
    pub host: String,
    pub port: u16,
    /// Route rewritten manifest entries through `/_segment` and `/_m3u`.
    pub proxy_segments: bool,
    /// Nvision M3U catalog, looked up by `xui-id`.
    pub nvision_m3u_url: Option<String>,
    /// BDIX JSON catalog.
    pub bdix_url: Option<String>,
    pub cache_ttl: Duration,
    pub fallback_mode: FallbackMode,
    /// First path segment of the channel-number route.
    pub route_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid PORT {:?}, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let default_ttl = Duration::from_secs_f64(DEFAULT_CACHE_TTL_SECONDS);
        let cache_ttl = match get("CACHE_TTL_SECONDS") {
            Some(raw) => match raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            {
                Some(ttl) => ttl,
                None => {
                    tracing::warn!(
                        "Invalid CACHE_TTL_SECONDS {:?}, using {}",
                        raw,
                        DEFAULT_CACHE_TTL_SECONDS
                    );
                    default_ttl
                }
            },
            None => default_ttl,
        };

        let route_prefix = get("ROUTE_PREFIX")
            .map(|p| p.trim().trim_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_ROUTE_PREFIX.to_string());

        Self {
            playlist_url: get("PLAYLIST_URL").unwrap_or_else(|| DEFAULT_PLAYLIST_URL.to_string()),
            subscription_url_template: get("SUBSCRIPTION_URL_TEMPLATE")
                .unwrap_or_else(|| DEFAULT_SUBSCRIPTION_URL_TEMPLATE.to_string()),
            expired_video_url: get("EXPIRED_VIDEO_URL")
                .unwrap_or_else(|| DEFAULT_EXPIRED_VIDEO_URL.to_string()),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            proxy_segments: get("PROXY_SEGMENTS")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("true")),
            nvision_m3u_url: get("NVSIONBD_M3U"),
            bdix_url: get("BDIX_M3U"),
            cache_ttl,
            fallback_mode: FallbackMode::parse(get("PROXY_FALLBACK_MODE").as_deref()),
            route_prefix,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::config_with;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.playlist_url, DEFAULT_PLAYLIST_URL);
        assert_eq!(config.port, 3000);
        assert!(!config.proxy_segments);
        assert!(config.nvision_m3u_url.is_none());
        assert!(config.bdix_url.is_none());
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.fallback_mode, FallbackMode::Wrapper);
        assert_eq!(config.route_prefix, "rz");
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_fallback_mode_parse() {
        assert_eq!(FallbackMode::parse(Some("redirect")), FallbackMode::Redirect);
        assert_eq!(FallbackMode::parse(Some("REDIRECT")), FallbackMode::Redirect);
        assert_eq!(FallbackMode::parse(Some("wrapper")), FallbackMode::Wrapper);
        assert_eq!(FallbackMode::parse(Some("bounce")), FallbackMode::Wrapper);
        assert_eq!(FallbackMode::parse(None), FallbackMode::Wrapper);
    }

    #[test]
    fn test_proxy_segments_flag() {
        assert!(config_with(&[("PROXY_SEGMENTS", "TRUE")]).proxy_segments);
        assert!(!config_with(&[("PROXY_SEGMENTS", "1")]).proxy_segments);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config_with(&[("PLAYLIST_URL", "  "), ("NVSIONBD_M3U", "")]);
        assert_eq!(config.playlist_url, DEFAULT_PLAYLIST_URL);
        assert!(config.nvision_m3u_url.is_none());
    }

    #[test]
    fn test_invalid_numbers_use_defaults() {
        let config = config_with(&[("PORT", "http"), ("CACHE_TTL_SECONDS", "-5")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));

        for ttl in ["1e300", "inf", "NaN", "soon"] {
            let config = config_with(&[("CACHE_TTL_SECONDS", ttl)]);
            assert_eq!(config.cache_ttl, Duration::from_secs(60), "{}", ttl);
        }
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            ("CACHE_TTL_SECONDS", "1.5"),
            ("BDIX_M3U", "https://bdix.example/channels.json"),
            ("PROXY_FALLBACK_MODE", "redirect"),
            ("ROUTE_PREFIX", "/tv/"),
            ("PORT", "8081"),
        ]);
        assert_eq!(config.cache_ttl, Duration::from_millis(1500));
        assert_eq!(
            config.bdix_url.as_deref(),
            Some("https://bdix.example/channels.json")
        );
        assert_eq!(config.fallback_mode, FallbackMode::Redirect);
        assert_eq!(config.route_prefix, "tv");
        assert_eq!(config.port, 8081);
    }
}
