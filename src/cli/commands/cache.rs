//! Cache inspection command.

use serde_json::Value;

use super::Context;
use crate::cli::args::{CacheCommands, OutputFormat};
use crate::error::FrontlineError;
use crate::output::format_cache;
use crate::storage::{CacheKey, CachedEntity, EntityCache};

/// Execute cache subcommands.
///
/// # Errors
///
/// Returns an error for an unknown collection name.
pub fn cache(ctx: &Context, cmd: CacheCommands, format: OutputFormat) -> Result<String, FrontlineError> {
    match cmd {
        CacheCommands::Show { collection } => {
            let key = CacheKey::from_name(&collection).ok_or_else(|| {
                FrontlineError::Config(format!(
                    "Unknown collection: {collection}. Expected products, customers, bills or expenses"
                ))
            })?;

            let entry: Option<CachedEntity<Value>> = EntityCache::new(ctx.store.clone()).entry(key);
            format_cache(key, entry.as_ref(), format)
        },
    }
}
