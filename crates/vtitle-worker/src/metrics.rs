//! Prometheus metrics for the title worker.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use vtitle_models::{BatchSummary, RunReport};

use crate::error::{WorkerError, WorkerResult};

/// Metric names as constants for consistency.
pub mod names {
    pub const UPDATES_TOTAL: &str = "vtitle_updates_total";
    pub const PEAK_ENGAGEMENT: &str = "vtitle_peak_engagement";
    pub const VIDEOS_PROCESSED_TOTAL: &str = "vtitle_videos_processed_total";
    pub const CYCLE_DURATION_SECONDS: &str = "vtitle_cycle_duration_seconds";
    pub const CYCLES_SKIPPED_TOTAL: &str = "vtitle_cycles_skipped_total";
}

/// Install the Prometheus recorder with an HTTP scrape listener on `port`.
///
/// Must be called from within the tokio runtime.
pub fn init_metrics(port: u16) -> WorkerResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| {
            WorkerError::config(format!(
                "failed to install Prometheus exporter on {}: {}",
                addr, e
            ))
        })
}

/// Record the outcome of one video: `updated`, `skipped` or an error kind.
pub fn record_video_outcome(outcome: &str) {
    counter!(
        names::VIDEOS_PROCESSED_TOTAL,
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record a finished cycle.
pub fn record_cycle(duration: Duration, summary: &BatchSummary) {
    histogram!(names::CYCLE_DURATION_SECONDS).record(duration.as_secs_f64());
    if summary.updated > 0 {
        counter!(names::UPDATES_TOTAL).increment(summary.updated as u64);
    }
}

/// A tick arrived while the previous cycle was still running.
pub fn record_cycle_skipped() {
    counter!(names::CYCLES_SKIPPED_TOTAL).increment(1);
}

/// Publish the run report gauges.
pub fn publish_report(report: &RunReport) {
    gauge!(names::PEAK_ENGAGEMENT).set(report.peak_engagement as f64);
}
