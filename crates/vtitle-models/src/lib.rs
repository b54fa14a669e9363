//! Shared data models for the vtitle title updater.
//!
//! This crate provides Serde-serializable types for:
//! - Configured video tasks
//! - Per-cycle video statistics
//! - Process-wide run statistics and their reporting snapshot
//! - Per-video process results and batch summaries

pub mod result;
pub mod run_stats;
pub mod video;

pub use result::{BatchSummary, ProcessResult};
pub use run_stats::{RunReport, RunStats};
pub use video::{VideoStats, VideoTask};
