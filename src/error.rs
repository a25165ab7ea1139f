use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid channel number: {0}")]
    InvalidChannelNumber(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Missing target URL")]
    MissingTarget,

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Failed to fetch URL: {url} - {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Fetch timeout for URL: {0}")]
    FetchTimeout(String),

    #[error("Invalid catalog payload from {url}: {reason}")]
    InvalidCatalog { url: String, reason: String },

    #[error("Source not configured: {0} is not set")]
    SourceNotConfigured(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

impl Error {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidChannelNumber(_) => "INVALID_CHANNEL_NUMBER",
            Self::MissingParameter(_) => "MISSING_PARAMETER",
            Self::MissingTarget => "MISSING_TARGET",
            Self::ChannelNotFound(_) => "CHANNEL_NOT_FOUND",
            Self::FetchFailed { .. } => "FETCH_FAILED",
            Self::FetchTimeout(_) => "FETCH_TIMEOUT",
            Self::InvalidCatalog { .. } => "INVALID_CATALOG",
            Self::SourceNotConfigured(_) => "SOURCE_NOT_CONFIGURED",
            Self::InvalidUrl(_) => "INVALID_URL",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidChannelNumber(_)
            | Self::MissingParameter(_)
            | Self::MissingTarget
            | Self::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            Self::ChannelNotFound(_) => StatusCode::NOT_FOUND,
            Self::FetchFailed { .. }
            | Self::InvalidCatalog { .. }
            | Self::SourceNotConfigured(_) => StatusCode::BAD_GATEWAY,
            Self::FetchTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Terse client-facing reason. Upstream and internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidChannelNumber(_) => "invalid channel number".to_string(),
            Self::MissingParameter(name) => format!("{} required", name),
            Self::MissingTarget => "missing target url".to_string(),
            Self::ChannelNotFound(_) => "channel not found".to_string(),
            Self::FetchFailed { .. } | Self::InvalidCatalog { .. } | Self::SourceNotConfigured(_) => {
                "upstream fetch failed".to_string()
            }
            Self::FetchTimeout(_) => "upstream timeout".to_string(),
            Self::InvalidUrl(_) => "invalid url".to_string(),
            Self::Internal(_) => "internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }
        let body = ErrorResponse {
            error: self.public_message(),
            code: self.error_code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidUrl(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::FetchTimeout(e.url().map(|u| u.to_string()).unwrap_or_default())
        } else {
            Self::FetchFailed {
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_input_errors_are_bad_request() {
        assert_eq!(
            Error::InvalidChannelNumber("abc".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::MissingParameter("subscriber").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::MissingTarget.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = Error::ChannelNotFound("99".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "channel not found");
    }

    #[test]
    fn test_upstream_details_are_not_exposed() {
        let err = Error::FetchFailed {
            url: "https://secret.example.com/list.json".into(),
            reason: "HTTP 403 Forbidden".into(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(!err.public_message().contains("secret"));
        assert!(err.to_string().contains("secret"));
    }

    #[test]
    fn test_missing_source_surfaces_as_fetch_failure() {
        let err = Error::SourceNotConfigured("BDIX_M3U");
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.public_message(), "upstream fetch failed");
    }

    #[test]
    fn test_missing_parameter_message() {
        assert_eq!(
            Error::MissingParameter("subscriber").public_message(),
            "subscriber required"
        );
    }
}
