//! YouTube request metrics.
//!
//! - Request counters by operation and status
//! - Latency histograms
//! - Retry and token refresh counters

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total YouTube/OAuth requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "youtube_requests_total";

    /// Total retry attempts by operation.
    pub const RETRIES_TOTAL: &str = "youtube_retries_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "youtube_latency_seconds";

    /// Access token refreshes by outcome.
    pub const TOKEN_REFRESHES_TOTAL: &str = "youtube_token_refreshes_total";
}

/// Record metrics for a completed request.
pub fn record_request(operation: &str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}

/// Record a retry attempt.
pub fn record_retry(operation: &str) {
    counter!(
        names::RETRIES_TOTAL,
        "operation" => operation.to_string()
    )
    .increment(1);
}

/// Record a token refresh.
pub fn record_token_refresh(success: bool) {
    counter!(
        names::TOKEN_REFRESHES_TOTAL,
        "outcome" => if success { "ok" } else { "error" }
    )
    .increment(1);
}
