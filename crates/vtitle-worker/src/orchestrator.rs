//! Batch orchestration.
//!
//! Videos are processed strictly one after another with a fixed pause in
//! between. Each video runs fetch, render and (if the title changed)
//! update; any failure is captured in that video's [`ProcessResult`] and
//! the batch moves on.

use std::time::{Duration, Instant};

use tracing::{info, Instrument};
use vtitle_models::{BatchSummary, ProcessResult, RunStats, VideoTask};

use crate::logging::VideoLogger;
use crate::metrics::{record_cycle, record_video_outcome};
use crate::stats::StatsFetcher;
use crate::title::TitleRenderer;
use crate::updater::UpdateExecutor;

pub struct BatchOrchestrator {
    stats: StatsFetcher,
    renderer: TitleRenderer,
    updater: UpdateExecutor,
    item_delay: Duration,
}

impl BatchOrchestrator {
    pub fn new(
        stats: StatsFetcher,
        renderer: TitleRenderer,
        updater: UpdateExecutor,
        item_delay: Duration,
    ) -> Self {
        Self {
            stats,
            renderer,
            updater,
            item_delay,
        }
    }

    /// Process one video. Never fails; errors are reported in the result.
    pub async fn process_video(&self, run_stats: &mut RunStats, task: &VideoTask) -> ProcessResult {
        let logger = VideoLogger::new(&task.video_id, "process_video");
        let span = logger.create_span();

        async {
            logger.log_start(&task.original_title);

            let stats = match self.stats.fetch_stats(&task.video_id, run_stats).await {
                Ok(stats) => stats,
                Err(e) => {
                    logger.log_error(&format!("fetching statistics failed: {}", e));
                    record_video_outcome(e.kind());
                    return ProcessResult::failed(&task.video_id, e.to_string(), None);
                }
            };
            logger.log_progress(&format!(
                "{} views, {} likes, {} comments",
                stats.views, stats.likes, stats.comments
            ));

            let candidate = self.renderer.render(&stats, &task.original_title);
            if candidate == stats.current_title {
                logger.log_skip("title already up to date");
                record_video_outcome("skipped");
                let current = stats.current_title.clone();
                return ProcessResult::unchanged(&task.video_id, current, stats);
            }

            match self.updater.update_title(&task.video_id, &candidate, run_stats).await {
                Ok(()) => {
                    logger.log_completion(&candidate);
                    record_video_outcome("updated");
                    let old_title = stats.current_title.clone();
                    ProcessResult::updated(&task.video_id, old_title, candidate, stats)
                }
                Err(e) => {
                    logger.log_error(&format!("updating title failed: {}", e));
                    record_video_outcome(e.kind());
                    ProcessResult::failed(&task.video_id, e.to_string(), Some(stats))
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Process `tasks` in order, pausing between consecutive videos.
    pub async fn process_batch(
        &self,
        run_stats: &mut RunStats,
        tasks: &[VideoTask],
    ) -> Vec<ProcessResult> {
        let start = Instant::now();
        let mut results = Vec::with_capacity(tasks.len());

        for (index, task) in tasks.iter().enumerate() {
            if index > 0 && !self.item_delay.is_zero() {
                tokio::time::sleep(self.item_delay).await;
            }
            results.push(self.process_video(run_stats, task).await);
        }

        let summary = BatchSummary::from_results(&results);
        let duration = start.elapsed();
        record_cycle(duration, &summary);
        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            updated = summary.updated,
            skipped = summary.skipped,
            duration_ms = duration.as_millis() as u64,
            "Batch complete"
        );

        results
    }
}
