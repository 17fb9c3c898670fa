//! JSON output formatting.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::FrontlineError;
use crate::features::session::Role;
use crate::features::sync::{DrainReport, QueueStats, QueuedAction, SkipReason};
use crate::storage::{CacheKey, CachedEntity};

/// Format queued actions as JSON
///
/// # Errors
///
/// Returns `FrontlineError::Parse` if JSON serialization fails.
pub fn format_queue_json(actions: &[QueuedAction], limit: usize) -> Result<String, FrontlineError> {
    let items: Vec<&QueuedAction> = actions.iter().take(limit).collect();
    to_json(&json!({
        "count": actions.len(),
        "items": items
    }))
}

/// Format queue statistics as JSON
///
/// # Errors
///
/// Returns `FrontlineError::Parse` if JSON serialization fails.
pub fn format_queue_stats_json(stats: &QueueStats, storage_failures: u64) -> Result<String, FrontlineError> {
    to_json(&json!({
        "pending": stats.pending,
        "retried": stats.retried,
        "oldest_pending": stats.oldest_pending.map(|t| t.to_rfc3339()),
        "storage_failures": storage_failures,
    }))
}

/// Format a drain outcome as JSON
///
/// # Errors
///
/// Returns `FrontlineError::Parse` if JSON serialization fails.
pub fn format_drain_report_json(report: &DrainReport) -> Result<String, FrontlineError> {
    let data = match report {
        DrainReport::Empty => json!({"status": "empty"}),
        DrainReport::Skipped(reason) => {
            let reason = match reason {
                SkipReason::NoBackend => "no_backend",
                SkipReason::Offline => "offline",
                SkipReason::AlreadyRunning => "already_running",
            };
            json!({"status": "skipped", "reason": reason})
        },
        DrainReport::Completed {
            synced,
            skipped_unknown,
            failed,
        } => json!({
            "status": "completed",
            "synced": synced,
            "skipped_unknown": skipped_unknown,
            "failed": failed.as_ref().map(|f| json!({
                "id": f.id,
                "type": f.action_type,
                "error": f.error.to_string(),
            })),
        }),
    };
    to_json(&data)
}

/// Format a cached collection as JSON
///
/// # Errors
///
/// Returns `FrontlineError::Parse` if JSON serialization fails.
pub fn format_cache_json(key: CacheKey, entry: Option<&CachedEntity<Value>>) -> Result<String, FrontlineError> {
    to_json(&json!({
        "collection": key.as_str(),
        "cached": entry.is_some(),
        "timestamp": entry.map(|e| e.timestamp),
        "data": entry.map(|e| &e.data),
    }))
}

/// Format the stored session as JSON
///
/// # Errors
///
/// Returns `FrontlineError::Parse` if JSON serialization fails.
pub fn format_session_json(role: Option<Role>) -> Result<String, FrontlineError> {
    to_json(&json!({
        "isAuthenticated": role.is_some(),
        "role": role,
    }))
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `FrontlineError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, FrontlineError> {
    Ok(serde_json::to_string_pretty(value)?)
}
