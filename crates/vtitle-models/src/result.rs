//! Per-video outcomes and batch summaries.

use serde::{Deserialize, Serialize};

use crate::video::VideoStats;

/// Outcome of processing one video in one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResult {
    pub success: bool,
    pub video_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<VideoStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// True when the rendered title already matched and no write was made
    #[serde(default)]
    pub skipped: bool,
}

impl ProcessResult {
    /// The rendered title was already live; nothing was written.
    pub fn unchanged(
        video_id: impl Into<String>,
        title: impl Into<String>,
        stats: VideoStats,
    ) -> Self {
        let title = title.into();
        Self {
            success: true,
            video_id: video_id.into(),
            old_title: Some(title.clone()),
            new_title: Some(title),
            stats: Some(stats),
            error: None,
            skipped: true,
        }
    }

    /// The title was rewritten on the platform.
    pub fn updated(
        video_id: impl Into<String>,
        old_title: impl Into<String>,
        new_title: impl Into<String>,
        stats: VideoStats,
    ) -> Self {
        Self {
            success: true,
            video_id: video_id.into(),
            old_title: Some(old_title.into()),
            new_title: Some(new_title.into()),
            stats: Some(stats),
            error: None,
            skipped: false,
        }
    }

    /// Processing failed at some stage. Stats are kept when the fetch got that far.
    pub fn failed(
        video_id: impl Into<String>,
        error: impl Into<String>,
        stats: Option<VideoStats>,
    ) -> Self {
        Self {
            success: false,
            video_id: video_id.into(),
            old_title: stats.as_ref().map(|s| s.current_title.clone()),
            new_title: None,
            stats,
            error: Some(error.into()),
            skipped: false,
        }
    }
}

/// Aggregate counts for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Successful results that needed no write
    pub skipped: usize,
    /// Successful results that performed a write
    pub updated: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[ProcessResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            summary.total += 1;
            if result.success {
                summary.succeeded += 1;
                if result.skipped {
                    summary.skipped += 1;
                } else {
                    summary.updated += 1;
                }
            } else {
                summary.failed += 1;
            }
            summary
        })
    }
}
