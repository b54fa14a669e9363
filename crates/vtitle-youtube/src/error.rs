//! YouTube client error types.

use thiserror::Error;

/// Result type for YouTube operations.
pub type YouTubeResult<T> = Result<T, YouTubeError>;

/// Errors that can occur while talking to the OAuth provider or the Data API.
#[derive(Debug, Error)]
pub enum YouTubeError {
    /// The OAuth provider refused to issue an access token.
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// The API rejected the bearer token (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Rate limited, retry after {0}ms")]
    RateLimited(u64),

    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Transport failure. The request URL is stripped because it carries the API key.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for YouTubeError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.without_url())
    }
}

impl YouTubeError {
    pub fn auth_error(msg: impl Into<String>) -> Self {
        Self::AuthError(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Map a non-success HTTP status to an error.
    pub fn from_http_status(status: u16, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        match status {
            401 => Self::Unauthorized(msg),
            403 => Self::PermissionDenied(msg),
            404 => Self::NotFound(msg),
            429 => Self::RateLimited(0),
            500..=599 => Self::ServerError(status, msg),
            _ => Self::RequestFailed(format!("HTTP {}: {}", status, msg)),
        }
    }

    /// Check if error is retryable at the transport level.
    ///
    /// Auth failures are not: they are recovered by refreshing the token.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            YouTubeError::Network(_)
                | YouTubeError::RateLimited(_)
                | YouTubeError::ServerError(_, _)
        )
    }

    /// True if the bearer token was rejected and a refresh may help.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, YouTubeError::Unauthorized(_))
    }

    /// HTTP status this error corresponds to, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            YouTubeError::Unauthorized(_) | YouTubeError::AuthError(_) => Some(401),
            YouTubeError::PermissionDenied(_) => Some(403),
            YouTubeError::NotFound(_) => Some(404),
            YouTubeError::RateLimited(_) => Some(429),
            YouTubeError::ServerError(status, _) => Some(*status),
            YouTubeError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Server-provided backoff hint, if any.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            YouTubeError::RateLimited(ms) if *ms > 0 => Some(*ms),
            _ => None,
        }
    }
}
