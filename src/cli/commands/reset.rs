//! Reset command implementation.

use serde_json::json;

use super::Context;
use crate::cli::args::OutputFormat;
use crate::error::FrontlineError;
use crate::features::reset_local_state;
use crate::features::sync::ActionQueue;
use crate::output::to_json;

/// Wipe all local state.
///
/// # Errors
///
/// Returns `FrontlineError::Config` unless `force` is set.
pub fn reset(ctx: &Context, force: bool, format: OutputFormat) -> Result<String, FrontlineError> {
    if !force {
        return Err(FrontlineError::Config(
            "Use --force to wipe all local state".to_string(),
        ));
    }

    let discarded = ActionQueue::new(ctx.store.clone()).len();
    reset_local_state(&ctx.store);

    match format {
        OutputFormat::Json => to_json(&json!({"reset": true, "discarded_actions": discarded})),
        OutputFormat::Pretty => Ok(if discarded > 0 {
            format!("Local state cleared ({discarded} unsynced actions discarded)")
        } else {
            "Local state cleared".to_string()
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Config;
    use crate::features::sync::NewAction;
    use crate::storage::{MemoryKv, PersistentStore};

    #[test]
    fn test_reset_requires_force() {
        let store = PersistentStore::new(Arc::new(MemoryKv::new()));
        let queue = ActionQueue::new(store.clone());
        queue.enqueue(NewAction::delete_bill(1));
        let ctx = Context::with_store(Config::default(), store);

        assert!(reset(&ctx, false, OutputFormat::Pretty).is_err());
        assert_eq!(queue.len(), 1);

        let output = reset(&ctx, true, OutputFormat::Pretty).unwrap();
        assert!(output.contains("1 unsynced"));
        assert!(queue.is_empty());
    }
}
