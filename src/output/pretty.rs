use chrono::{DateTime, TimeZone, Utc};
use colored::Colorize;
use serde_json::Value;

use crate::features::session::Role;
use crate::features::sync::{DrainReport, QueueStats, QueuedAction, SkipReason};
use crate::storage::{CacheKey, CachedEntity};

/// Format queued actions as a table, oldest first
pub fn format_queue_pretty(actions: &[QueuedAction], limit: usize) -> String {
    if actions.is_empty() {
        return "Sync Queue (0 actions)\n  Nothing to sync".to_string();
    }

    let mut lines = Vec::new();
    lines.push(format!("Sync Queue ({} actions)", actions.len()));
    lines.push("─".repeat(72));
    lines.push(format!(
        "{:<26} {:<18} {:<17} {}",
        "ID", "Type", "Queued", "Retries"
    ));
    lines.push("─".repeat(72));

    for action in actions.iter().take(limit) {
        let queued = action
            .queued_at()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let retries = match action.retry_count {
            0 => "0".normal(),
            n => n.to_string().red(),
        };
        let kind = format!("{:<18}", action.action_type.display_name());
        let kind = if action.action_type.is_known() {
            kind.normal()
        } else {
            kind.yellow()
        };

        lines.push(format!(
            "{:<26} {} {:<17} {}",
            action.id, kind, queued, retries
        ));
    }

    if actions.len() > limit {
        lines.push(
            format!("... {} more", actions.len() - limit)
                .dimmed()
                .to_string(),
        );
    }

    lines.join("\n")
}

/// Format queue statistics
pub fn format_queue_stats_pretty(stats: &QueueStats, storage_failures: u64) -> String {
    let mut lines = Vec::new();

    lines.push("Sync Queue Status".bold().to_string());
    lines.push("─".repeat(40));

    lines.push(format!(
        "  Pending:    {} {}",
        stats.pending,
        if stats.pending > 0 {
            "actions waiting".dimmed()
        } else {
            "".dimmed()
        }
    ));

    lines.push(format!(
        "  Retried:    {} {}",
        stats.retried,
        if stats.retried > 0 {
            "actions failed at least once".red()
        } else {
            "".normal()
        }
    ));

    if let Some(oldest) = stats.oldest_pending {
        lines.push(format!("  Oldest:     {}", format_age(oldest).dimmed()));
    }

    if storage_failures > 0 {
        lines.push(format!(
            "  Storage:    {}",
            format!("{storage_failures} failed writes").red()
        ));
    }

    if stats.pending > 0 {
        lines.push(String::new());
        lines.push(
            "Run 'frontline sync run' to replay pending actions"
                .dimmed()
                .to_string(),
        );
    }

    lines.join("\n")
}

/// Format the outcome of a drain
pub fn format_drain_report_pretty(report: &DrainReport) -> String {
    match report {
        DrainReport::Empty => "No pending actions to sync.".to_string(),
        DrainReport::Skipped(reason) => {
            let why = match reason {
                SkipReason::NoBackend => "no backend configured",
                SkipReason::Offline => "offline",
                SkipReason::AlreadyRunning => "a sync is already running",
            };
            format!("{} {}", "Sync skipped:".yellow(), why)
        },
        DrainReport::Completed {
            synced,
            skipped_unknown,
            failed,
        } => {
            let mut lines = Vec::new();
            lines.push("Sync Results".bold().to_string());
            lines.push("─".repeat(40));
            lines.push(format!("  {} Synced:   {synced}", "✓".green()));
            if *skipped_unknown > 0 {
                lines.push(format!("  {} Dropped:  {skipped_unknown} unknown", "○".yellow()));
            }
            if let Some(failed) = failed {
                lines.push(format!(
                    "  {} Failed:   {} ({})",
                    "✗".red(),
                    failed.action_type,
                    failed.id
                ));
                lines.push(format!("    {}", failed.error.to_string().red()));
            }
            lines.join("\n")
        },
    }
}

/// Format a cached collection
pub fn format_cache_pretty(key: CacheKey, entry: Option<&CachedEntity<Value>>) -> String {
    let Some(entry) = entry else {
        return format!("{} (not cached)", key.to_string().bold());
    };

    let items = entry.data.as_array().map_or(1, Vec::len);
    let written = Utc
        .timestamp_millis_opt(entry.timestamp)
        .single()
        .map(format_age)
        .unwrap_or_default();

    let mut output = format!("{} ({items} items, cached {})\n", key.to_string().bold(), written.dimmed());
    output.push_str(&"─".repeat(60));
    output.push('\n');
    output.push_str(&serde_json::to_string_pretty(&entry.data).unwrap_or_default());
    output
}

/// Format the stored session
pub fn format_session_pretty(role: Option<Role>) -> String {
    match role {
        Some(role) => format!("{} as {}", "Signed in".green(), role.to_string().bold()),
        None => "Signed out".dimmed().to_string(),
    }
}

/// Human-friendly age of a timestamp
pub fn format_age(at: DateTime<Utc>) -> String {
    let age = Utc::now().signed_duration_since(at);
    if age.num_days() > 0 {
        format!("{} days ago", age.num_days())
    } else if age.num_hours() > 0 {
        format!("{} hours ago", age.num_hours())
    } else if age.num_minutes() > 0 {
        format!("{} minutes ago", age.num_minutes())
    } else {
        "just now".to_string()
    }
}
