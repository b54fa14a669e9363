//! Scheduled worker that keeps video titles in sync with their statistics.
//!
//! This crate provides:
//! - Environment configuration
//! - Statistics fetching and title rendering
//! - Title write-back with a single auth retry
//! - Sequential batch orchestration with pacing
//! - Fixed-interval scheduling with graceful shutdown

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod orchestrator;
pub mod scheduler;
pub mod stats;
pub mod title;
pub mod updater;

#[cfg(test)]
mod testing;

pub use config::{Credentials, WorkerConfig};
pub use error::{WorkerError, WorkerResult};
pub use logging::VideoLogger;
pub use orchestrator::BatchOrchestrator;
pub use scheduler::{CycleGuard, Scheduler};
pub use stats::StatsFetcher;
pub use title::{TitleRenderer, TitleTemplate};
pub use updater::UpdateExecutor;
