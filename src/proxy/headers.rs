use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, RANGE, REFERER, USER_AGENT};

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Accept header favoring HLS playlists.
pub const HLS_ACCEPT: &str = "application/vnd.apple.mpegurl, application/x-mpegURL, */*;q=0.9";

pub const ANY_ACCEPT: &str = "*/*";

/// Builder for the browser-like request headers some origins insist on.
pub struct BrowserHeaders;

impl BrowserHeaders {
    /// Browser User-Agent, the given `Accept`, and `Referer` when it is a valid header value.
    pub fn build(accept: &str, referer: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        if let Ok(value) = HeaderValue::from_str(accept) {
            headers.insert(ACCEPT, value);
        }
        match HeaderValue::from_str(referer) {
            Ok(value) => {
                headers.insert(REFERER, value);
            }
            Err(_) => tracing::warn!("Skipping unusable Referer header: {:?}", referer),
        }
        headers
    }

    /// Headers for a segment pass-through, forwarding the client's `Range` if any.
    pub fn for_segment(referer: &str, range: Option<&HeaderValue>) -> HeaderMap {
        let mut headers = Self::build(ANY_ACCEPT, referer);
        if let Some(range) = range {
            headers.insert(RANGE, range.clone());
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_sets_browser_headers() {
        let headers = BrowserHeaders::build(HLS_ACCEPT, "https://catalog.example/playlist.json");

        assert!(headers[USER_AGENT].to_str().unwrap().starts_with("Mozilla/5.0"));
        assert_eq!(headers[ACCEPT], HLS_ACCEPT);
        assert_eq!(headers[REFERER], "https://catalog.example/playlist.json");
    }

    #[test]
    fn test_invalid_referer_is_skipped() {
        let headers = BrowserHeaders::build(HLS_ACCEPT, "bad\nreferer");
        assert!(headers.get(REFERER).is_none());
        assert!(headers.get(USER_AGENT).is_some());
    }

    #[test]
    fn test_segment_headers_forward_range() {
        let range = HeaderValue::from_static("bytes=0-1023");
        let headers = BrowserHeaders::for_segment("https://catalog.example/", Some(&range));

        assert_eq!(headers[RANGE], "bytes=0-1023");
        assert_eq!(headers[ACCEPT], "*/*");
    }

    #[test]
    fn test_segment_headers_without_range() {
        let headers = BrowserHeaders::for_segment("https://catalog.example/", None);
        assert!(headers.get(RANGE).is_none());
    }
}
