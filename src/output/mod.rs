//! Output formatting for frontline.
//!
//! Every command renders either colored text or pretty-printed JSON.

mod json;
mod pretty;

use serde_json::Value;

use crate::cli::args::OutputFormat;
use crate::error::FrontlineError;
use crate::features::session::Role;
use crate::features::sync::{DrainReport, QueueStats, QueuedAction};
use crate::storage::{CacheKey, CachedEntity};

pub use json::*;
pub use pretty::*;

/// Format queued actions based on output format
///
/// # Errors
///
/// Returns `FrontlineError::Parse` if JSON serialization fails.
pub fn format_queue(
    actions: &[QueuedAction],
    limit: usize,
    format: OutputFormat,
) -> Result<String, FrontlineError> {
    match format {
        OutputFormat::Pretty => Ok(format_queue_pretty(actions, limit)),
        OutputFormat::Json => format_queue_json(actions, limit),
    }
}

/// Format queue statistics based on output format
///
/// # Errors
///
/// Returns `FrontlineError::Parse` if JSON serialization fails.
pub fn format_queue_stats(
    stats: &QueueStats,
    storage_failures: u64,
    format: OutputFormat,
) -> Result<String, FrontlineError> {
    match format {
        OutputFormat::Pretty => Ok(format_queue_stats_pretty(stats, storage_failures)),
        OutputFormat::Json => format_queue_stats_json(stats, storage_failures),
    }
}

/// Format a drain outcome based on output format
///
/// # Errors
///
/// Returns `FrontlineError::Parse` if JSON serialization fails.
pub fn format_drain_report(report: &DrainReport, format: OutputFormat) -> Result<String, FrontlineError> {
    match format {
        OutputFormat::Pretty => Ok(format_drain_report_pretty(report)),
        OutputFormat::Json => format_drain_report_json(report),
    }
}

/// Format a cached collection based on output format
///
/// # Errors
///
/// Returns `FrontlineError::Parse` if JSON serialization fails.
pub fn format_cache(
    key: CacheKey,
    entry: Option<&CachedEntity<Value>>,
    format: OutputFormat,
) -> Result<String, FrontlineError> {
    match format {
        OutputFormat::Pretty => Ok(format_cache_pretty(key, entry)),
        OutputFormat::Json => format_cache_json(key, entry),
    }
}

/// Format the stored session based on output format
///
/// # Errors
///
/// Returns `FrontlineError::Parse` if JSON serialization fails.
pub fn format_session(role: Option<Role>, format: OutputFormat) -> Result<String, FrontlineError> {
    match format {
        OutputFormat::Pretty => Ok(format_session_pretty(role)),
        OutputFormat::Json => format_session_json(role),
    }
}
