//! Worker error types.

use thiserror::Error;
use vtitle_youtube::YouTubeError;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    /// Missing or invalid configuration. Fatal before any network call.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The access token could not be refreshed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The platform has no video with this id.
    #[error("Video not found: {0}")]
    NotFound(String),

    /// Transport or HTTP failure other than a refresh failure.
    #[error("API error: {0}")]
    Api(YouTubeError),

    /// The title write failed, including after the single auth retry.
    #[error("Update failed for {video_id}: {reason}")]
    Update { video_id: String, reason: String },
}

impl WorkerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn not_found(video_id: impl Into<String>) -> Self {
        Self::NotFound(video_id.into())
    }

    pub fn update(video_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Update {
            video_id: video_id.into(),
            reason: reason.into(),
        }
    }

    /// Classify a client error into the worker taxonomy.
    pub fn from_api(err: YouTubeError) -> Self {
        match err {
            YouTubeError::AuthError(msg) => Self::Auth(msg),
            YouTubeError::NotFound(msg) => Self::NotFound(msg),
            other => Self::Api(other),
        }
    }

    /// True if the platform rejected the bearer token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, WorkerError::Api(e) if e.is_auth_failure())
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkerError::Config(_) => "config",
            WorkerError::Auth(_) => "auth",
            WorkerError::NotFound(_) => "not_found",
            WorkerError::Api(_) => "api",
            WorkerError::Update { .. } => "update",
        }
    }
}
