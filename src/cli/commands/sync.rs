//! Sync queue command implementation.

use std::sync::Arc;

use colored::Colorize;
use serde_json::{json, Value};
use tracing::info;

use super::Context;
use crate::cli::args::{OutputFormat, SyncCommands};
use crate::error::FrontlineError;
use crate::features::sync::{
    validate_payload, ActionQueue, ActionType, HttpBackend, NewAction, SyncMonitor,
};
use crate::output::{format_drain_report, format_queue, format_queue_stats, to_json};
use crate::storage::EntityCache;

/// Execute sync subcommands.
///
/// # Errors
///
/// Returns an error for invalid input, a missing action id, or a backend
/// that cannot be built.
pub async fn sync(
    ctx: &Context,
    cmd: SyncCommands,
    format: OutputFormat,
) -> Result<String, FrontlineError> {
    let queue = ActionQueue::new(ctx.store.clone());

    match cmd {
        SyncCommands::Status => format_queue_stats(&queue.stats(), ctx.store.failure_count(), format),
        SyncCommands::List { limit } => format_queue(&queue.get_queue(), limit, format),
        SyncCommands::Enqueue {
            action_type,
            payload,
        } => enqueue_action(&queue, &action_type, &payload, format),
        SyncCommands::Run => run_sync(ctx, queue, format).await,
        SyncCommands::Drop { id } => drop_action(&queue, &id, format),
    }
}

/// Queue an action by hand.
fn enqueue_action(
    queue: &ActionQueue,
    action_type: &str,
    payload: &str,
    format: OutputFormat,
) -> Result<String, FrontlineError> {
    let kind = ActionType::parse(action_type).ok_or_else(|| {
        FrontlineError::Config(format!("Unknown action type: {action_type}"))
    })?;
    let payload: Value = serde_json::from_str(payload)?;
    // A payload that cannot decode would block every later drain at the head.
    validate_payload(&kind, &payload).map_err(|e| FrontlineError::Config(e.to_string()))?;

    let queued = queue.enqueue(NewAction::new(kind, payload));

    match format {
        OutputFormat::Json => to_json(&queued),
        OutputFormat::Pretty => Ok(format!(
            "Queued {} action (ID: {})",
            queued.action_type.display_name(),
            queued.id
        )),
    }
}

/// Drain the queue once against the configured backend.
async fn run_sync(
    ctx: &Context,
    queue: ActionQueue,
    format: OutputFormat,
) -> Result<String, FrontlineError> {
    let backend = HttpBackend::from_config(&ctx.config.backend)?;
    let monitor = SyncMonitor::new(
        queue,
        EntityCache::new(ctx.store.clone()),
        ctx.config.sync.clone(),
    );
    monitor.attach_backend(Arc::new(backend));

    // Reachability is decided by the first call; a transport error halts the
    // drain like any other rejection.
    monitor.set_online(true);
    let report = monitor.process_queue().await;
    info!(?report, "sync run finished");

    format_drain_report(&report, format)
}

/// Remove one action without syncing it.
fn drop_action(queue: &ActionQueue, id: &str, format: OutputFormat) -> Result<String, FrontlineError> {
    let action = queue
        .get(id)
        .ok_or_else(|| FrontlineError::NotFound(format!("Queued action {id}")))?;
    queue.dequeue(id);

    match format {
        OutputFormat::Json => to_json(&json!({"dropped": action})),
        OutputFormat::Pretty => Ok(format!(
            "Dropped {} action {}",
            action.action_type.display_name(),
            action.id.dimmed()
        )),
    }
}
