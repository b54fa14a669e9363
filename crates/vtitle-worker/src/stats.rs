//! Statistics fetching.

use std::sync::Arc;

use tracing::debug;
use vtitle_models::{RunStats, VideoStats};
use vtitle_youtube::VideoPlatform;

use crate::error::{WorkerError, WorkerResult};

/// Reads live counters and the current title of a video.
#[derive(Clone)]
pub struct StatsFetcher {
    platform: Arc<dyn VideoPlatform>,
}

impl StatsFetcher {
    pub fn new(platform: Arc<dyn VideoPlatform>) -> Self {
        Self { platform }
    }

    /// Fetch statistics for `video_id` and fold its engagement into `run_stats`.
    ///
    /// Counters the owner has hidden are reported as zero.
    pub async fn fetch_stats(
        &self,
        video_id: &str,
        run_stats: &mut RunStats,
    ) -> WorkerResult<VideoStats> {
        let video = self
            .platform
            .fetch_video(video_id)
            .await
            .map_err(WorkerError::from_api)?
            .ok_or_else(|| WorkerError::not_found(video_id))?;

        let counters = video.statistics.unwrap_or_default();
        let snippet = video.snippet.unwrap_or_default();

        let stats = VideoStats::new(
            counters.view_count,
            counters.like_count,
            counters.comment_count,
            snippet.title,
            snippet.published_at,
        );

        if run_stats.observe_engagement(stats.engagement()) {
            debug!(video_id, peak = run_stats.peak_engagement, "New peak engagement");
        }

        Ok(stats)
    }
}
