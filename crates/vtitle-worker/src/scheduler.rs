//! Fixed-cadence cycle scheduling.
//!
//! The first cycle runs immediately, then one per interval. At most one
//! cycle is in flight: a tick that arrives while a cycle is still running
//! is dropped rather than queued. Shutdown is only observed between cycles
//! so a running cycle always completes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use vtitle_models::{ProcessResult, RunReport, RunStats, VideoTask};
use vtitle_youtube::{OAuthClient, TokenCache, YouTubeClient};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::metrics::{publish_report, record_cycle_skipped};
use crate::orchestrator::BatchOrchestrator;
use crate::stats::StatsFetcher;
use crate::title::TitleRenderer;
use crate::updater::UpdateExecutor;

/// Marks a cycle as running for as long as it is alive.
pub struct CycleGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> CycleGuard<'a> {
    /// `None` if another cycle holds the flag.
    pub fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

struct RunState {
    run_stats: RunStats,
    next_cycle_at: Option<DateTime<Utc>>,
}

/// Drives the batch orchestrator on a fixed interval.
pub struct Scheduler {
    orchestrator: BatchOrchestrator,
    tasks: Vec<VideoTask>,
    interval: Duration,
    state: Mutex<RunState>,
    in_progress: AtomicBool,
}

impl Scheduler {
    pub fn new(orchestrator: BatchOrchestrator, tasks: Vec<VideoTask>, interval: Duration) -> Self {
        Self {
            orchestrator,
            tasks,
            interval,
            state: Mutex::new(RunState {
                run_stats: RunStats::new(Utc::now()),
                next_cycle_at: None,
            }),
            in_progress: AtomicBool::new(false),
        }
    }

    /// Wire the production collaborators from configuration.
    pub fn from_config(config: WorkerConfig) -> WorkerResult<Self> {
        let client = YouTubeClient::new(config.youtube.clone(), config.credentials.api_key.clone())
            .map_err(|e| WorkerError::config(format!("failed to build HTTP client: {}", e)))?;
        let oauth = OAuthClient::new(
            client.http().clone(),
            config.token_url.clone(),
            config.credentials.oauth(),
        );

        let platform = Arc::new(client);
        let tokens = Arc::new(TokenCache::new(Arc::new(oauth)));

        let orchestrator = BatchOrchestrator::new(
            StatsFetcher::new(platform.clone()),
            TitleRenderer::random(),
            UpdateExecutor::new(platform, tokens, config.credentials.channel_id.clone()),
            config.item_delay,
        );

        Ok(Self::new(orchestrator, config.tasks, config.update_interval))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one cycle now. `None` if a cycle is already in progress.
    pub async fn run_cycle(&self) -> Option<Vec<ProcessResult>> {
        let Some(_guard) = CycleGuard::try_acquire(&self.in_progress) else {
            warn!("Previous cycle still running, skipping this tick");
            record_cycle_skipped();
            return None;
        };

        let started_at = Utc::now();
        let mut state = self.state.lock().await;
        let results = self
            .orchestrator
            .process_batch(&mut state.run_stats, &self.tasks)
            .await;

        state.next_cycle_at = chrono::Duration::from_std(self.interval)
            .ok()
            .map(|interval| started_at + interval);

        let report = state.run_stats.report(Utc::now(), state.next_cycle_at);
        log_report(&report);
        publish_report(&report);

        Some(results)
    }

    /// Current reporting snapshot.
    pub async fn report(&self) -> RunReport {
        let state = self.state.lock().await;
        state.run_stats.report(Utc::now(), state.next_cycle_at)
    }

    /// Run cycles until `shutdown` turns true or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            videos = self.tasks.len(),
            interval_secs = self.interval.as_secs(),
            "Scheduler started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }

            // Outside the select so shutdown cannot cancel a running cycle
            self.run_cycle().await;
        }

        info!("Scheduler stopped");
    }
}

fn log_report(report: &RunReport) {
    info!(
        total_updates = report.total_updates,
        last_update = ?report.last_update,
        peak_engagement = report.peak_engagement,
        uptime_secs = report.uptime_secs,
        next_update = ?report.next_update_estimate,
        "Run report"
    );
}
