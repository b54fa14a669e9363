//! Process-wide run statistics.
//!
//! `RunStats` lives for the lifetime of the process and is only ever
//! moved forward: the update counter grows, the last update timestamp
//! advances and the engagement peak never decreases. `RunReport` is the
//! read-only snapshot handed to logging and telemetry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counters accumulated across cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Successful title writes since start
    pub updates_performed: u64,
    /// When the last successful write happened
    pub last_update_at: Option<DateTime<Utc>>,
    /// Highest likes + comments observed on any video
    pub peak_engagement: u64,
    /// When the process started
    pub started_at: DateTime<Utc>,
}

impl RunStats {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            updates_performed: 0,
            last_update_at: None,
            peak_engagement: 0,
            started_at,
        }
    }

    /// Fold an engagement observation into the peak.
    ///
    /// Returns true if the observation raised the peak.
    pub fn observe_engagement(&mut self, engagement: u64) -> bool {
        if engagement > self.peak_engagement {
            self.peak_engagement = engagement;
            true
        } else {
            false
        }
    }

    /// Count a successful title write.
    pub fn record_update(&mut self, at: DateTime<Utc>) {
        self.updates_performed += 1;
        self.last_update_at = Some(at);
    }

    /// Snapshot for reporting.
    pub fn report(&self, now: DateTime<Utc>, next_update: Option<DateTime<Utc>>) -> RunReport {
        RunReport {
            total_updates: self.updates_performed,
            last_update: self.last_update_at,
            peak_engagement: self.peak_engagement,
            uptime_secs: (now - self.started_at).num_seconds().max(0) as u64,
            next_update_estimate: next_update,
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

/// Periodic reporting snapshot of [`RunStats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub total_updates: u64,
    pub last_update: Option<DateTime<Utc>>,
    pub peak_engagement: u64,
    pub uptime_secs: u64,
    pub next_update_estimate: Option<DateTime<Utc>>,
}
