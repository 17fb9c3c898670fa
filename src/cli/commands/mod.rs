//! Command implementations for frontline.
//!
//! Every command renders its result to a string; `main` prints it.

mod cache;
mod completions;
mod reset;
mod session;
mod sync;

use std::sync::Arc;

use tracing::debug;

pub use cache::cache;
pub use completions::{completion_install_instructions, completions, generate_completions, shell_from_str};
pub use reset::reset;
pub use session::session;
pub use sync::sync;

use crate::config::Config;
use crate::error::FrontlineError;
use crate::storage::{KvBackend, MemoryKv, PersistentStore, SqliteKv};

/// Everything a command needs: configuration and the opened store.
pub struct Context {
    pub config: Config,
    pub store: PersistentStore,
}

impl Context {
    /// Open the configured storage medium.
    ///
    /// # Errors
    ///
    /// Returns an error if the on-disk database cannot be opened.
    pub fn open(config: Config) -> Result<Self, FrontlineError> {
        let backend: Arc<dyn KvBackend> = if config.storage.in_memory {
            debug!("using in-memory storage");
            Arc::new(MemoryKv::new())
        } else {
            Arc::new(SqliteKv::open()?)
        };
        let store = PersistentStore::with_prefix(backend, config.storage.prefix.clone());

        Ok(Self { config, store })
    }

    /// A context over an arbitrary store, for tests and embedding.
    #[must_use]
    pub const fn with_store(config: Config, store: PersistentStore) -> Self {
        Self { config, store }
    }
}
