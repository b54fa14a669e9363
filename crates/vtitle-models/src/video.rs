//! Video task and statistics models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A configured video whose title is kept in sync with its statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoTask {
    /// Platform video identifier
    pub video_id: String,
    /// Title the rendered title is built around
    pub original_title: String,
}

impl VideoTask {
    pub fn new(video_id: impl Into<String>, original_title: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            original_title: original_title.into(),
        }
    }
}

/// Engagement statistics for a single video, recomputed every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoStats {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    /// Title currently live on the platform
    pub current_title: String,
    pub published_at: Option<DateTime<Utc>>,
    /// likes / views, 0 when there are no views
    pub like_ratio: f64,
    /// comments / views, 0 when there are no views
    pub comment_ratio: f64,
}

impl VideoStats {
    /// Build stats from raw counters, deriving the engagement ratios.
    pub fn new(
        views: u64,
        likes: u64,
        comments: u64,
        current_title: impl Into<String>,
        published_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            views,
            likes,
            comments,
            current_title: current_title.into(),
            published_at,
            like_ratio: ratio(likes, views),
            comment_ratio: ratio(comments, views),
        }
    }

    /// Likes plus comments.
    pub fn engagement(&self) -> u64 {
        self.likes.saturating_add(self.comments)
    }
}

fn ratio(count: u64, views: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    (count as f64 / views as f64).clamp(0.0, 1.0)
}
