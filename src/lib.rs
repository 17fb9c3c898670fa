//! frontline - offline-first sync core for a small-distribution point of sale
//!
//! Mutations are attempted against the backend immediately; failures are
//! queued in a durable local store and replayed in order when connectivity
//! returns.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod features;
pub mod output;
pub mod storage;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::{BackendError, FrontlineError};
pub use features::sync::{ActionQueue, OfflineExecutor, SyncMonitor};
pub use storage::PersistentStore;
