use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when interacting with the Claude API
#[derive(Error, Debug)]
pub enum ClaudeApiError {
    /// Invalid request parameters (HTTP 400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid or missing API key (HTTP 401)
    #[error("Invalid API key - authentication failed")]
    InvalidApiKey,

    /// Forbidden - permission denied (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded - too many requests")]
    RateLimitExceeded,

    /// Server error from Claude API (HTTP 5xx, 529)
    #[error("Server error ({0}): {1}")]
    ServerError(StatusCode, String),

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Any other non-success status
    #[error("Unknown error ({0}): {1}")]
    UnknownError(StatusCode, String),
}

/// `{"type":"error","error":{"type":"...","message":"..."}}`
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl ClaudeApiError {
    /// Classify a non-success response.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.trim().to_string());

        match status {
            StatusCode::BAD_REQUEST => Self::InvalidRequest(message),
            StatusCode::UNAUTHORIZED => Self::InvalidApiKey,
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimitExceeded,
            status if status.is_server_error() || status.as_u16() == 529 => {
                Self::ServerError(status, message)
            }
            status => Self::UnknownError(status, message),
        }
    }

    /// HTTP status behind this error, if the service answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::InvalidRequest(_) => Some(400),
            Self::InvalidApiKey => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound => Some(404),
            Self::RateLimitExceeded => Some(429),
            Self::ServerError(status, _) | Self::UnknownError(status, _) => Some(status.as_u16()),
            Self::NetworkError(err) => err.status().map(|s| s.as_u16()),
            Self::JsonError(_) => None,
        }
    }

    /// Whether the service could not be reached (connect failure, timeout).
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::NetworkError(err) if err.status().is_none() && !err.is_decode())
    }
}
