//! Offline action queue and sync.
//!
//! Mutations are attempted against the backend immediately. Those that fail
//! are queued locally and replayed, oldest first, once the device is back
//! online.
//!
//! - [`OfflineExecutor`]: try now, queue on failure
//! - [`ActionQueue`]: durable FIFO of pending actions
//! - [`SyncMonitor`]: connectivity tracking and drain scheduling
//! - [`RemoteBackend`]: where replayed actions go

pub mod action;
pub mod backend;
pub mod executor;
pub mod monitor;
pub mod queue;

pub use action::{ActionType, NewAction, QueuedAction};
pub use backend::{dispatch, validate_payload, Dispatched, HttpBackend, RemoteBackend};
pub use executor::OfflineExecutor;
pub use monitor::{DrainReport, FailedAction, SkipReason, SyncMonitor, SyncStatus};
pub use queue::{ActionQueue, QueueStats, QUEUE_KEY};
