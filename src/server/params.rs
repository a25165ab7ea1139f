use serde::Deserialize;

/// Query parameters shared by the channel redirect routes.
#[derive(Debug, Default, Deserialize)]
pub struct GateParams {
    /// `1` or `true` requests subscription-gated manifest mode.
    #[serde(default)]
    pub m3u: Option<String>,

    /// Subscriber whose status gates the redirect.
    #[serde(default)]
    pub subscriber: Option<String>,
}

impl GateParams {
    pub fn manifest_mode(&self) -> bool {
        matches!(self.m3u.as_deref(), Some("1") | Some("true"))
    }

    /// Subscriber id, treating an empty value as absent.
    pub fn subscriber(&self) -> Option<&str> {
        self.subscriber.as_deref().filter(|s| !s.is_empty())
    }
}

/// Query parameters for the `/_m3u` and `/_segment` endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ProxyParams {
    /// Target URL.
    #[serde(default)]
    pub u: Option<String>,
}

impl ProxyParams {
    pub fn target(&self) -> Option<&str> {
        self.u.as_deref().filter(|u| !u.is_empty())
    }
}
