//! Title write-back.
//!
//! An update is a read-modify-write of the video snippet: the current
//! snippet is re-read as the channel owner so that fields this worker
//! does not manage (description, tags, category, ...) are sent back
//! unchanged. A rejected bearer token triggers exactly one forced
//! refresh and one retry of the whole operation.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use vtitle_models::RunStats;
use vtitle_youtube::{TokenCache, VideoPlatform, VideoUpdate};

use crate::error::{WorkerError, WorkerResult};

/// Writes new titles to the platform.
pub struct UpdateExecutor {
    platform: Arc<dyn VideoPlatform>,
    tokens: Arc<TokenCache>,
    channel_id: Option<String>,
}

impl UpdateExecutor {
    pub fn new(
        platform: Arc<dyn VideoPlatform>,
        tokens: Arc<TokenCache>,
        channel_id: Option<String>,
    ) -> Self {
        Self {
            platform,
            tokens,
            channel_id,
        }
    }

    /// Replace the title of `video_id` and count the write in `run_stats`.
    pub async fn update_title(
        &self,
        video_id: &str,
        new_title: &str,
        run_stats: &mut RunStats,
    ) -> WorkerResult<()> {
        match self.attempt(video_id, new_title).await {
            Ok(()) => {}
            Err(e) if e.is_auth_failure() => {
                warn!(video_id, error = %e, "Access token rejected, refreshing and retrying once");
                self.tokens.force_refresh().await.map_err(|e| {
                    WorkerError::update(video_id, format!("token refresh after 401 failed: {}", e))
                })?;
                self.attempt(video_id, new_title).await.map_err(|e| {
                    let reason = format!("retry after token refresh failed: {}", e);
                    WorkerError::update(video_id, reason)
                })?;
            }
            Err(e) => return Err(e),
        }

        run_stats.record_update(Utc::now());
        info!(video_id, title = new_title, "Title updated");
        Ok(())
    }

    /// One pass of token, snippet read, write.
    ///
    /// A rejected token is returned as `Api(Unauthorized)` so the caller can
    /// retry; every other write failure becomes `Update`.
    async fn attempt(&self, video_id: &str, new_title: &str) -> WorkerResult<()> {
        let token = self.tokens.ensure_valid_token().await.map_err(WorkerError::from_api)?;

        let snippet = self
            .platform
            .fetch_snippet(token.as_str(), video_id)
            .await
            .map_err(WorkerError::from_api)?
            .ok_or_else(|| WorkerError::not_found(video_id))?;

        if let Some(expected) = &self.channel_id {
            if snippet.channel_id.as_deref() != Some(expected.as_str()) {
                return Err(WorkerError::update(
                    video_id,
                    format!(
                        "video belongs to channel {}, not {}",
                        snippet.channel_id.as_deref().unwrap_or("<unknown>"),
                        expected
                    ),
                ));
            }
        }

        let update = VideoUpdate::retitle(video_id, snippet, new_title);
        match self.platform.update_video(token.as_str(), &update).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_auth_failure() => Err(WorkerError::Api(e)),
            Err(e) => Err(WorkerError::update(video_id, e.to_string())),
        }
    }
}
