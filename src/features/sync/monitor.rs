//! Connectivity tracking and queue draining.
//!
//! The monitor replays queued actions in FIFO order and stops at the first
//! rejection, so a later action never overtakes one it may depend on (a bill
//! referencing a product that has not been created yet, for instance).
//! Status is published through a [`watch`] channel for whoever displays it.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tokio::sync::{watch, Notify};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::action::ActionType;
use super::backend::{dispatch, Dispatched, RemoteBackend};
use super::queue::ActionQueue;
use crate::config::SyncConfig;
use crate::error::BackendError;
use crate::storage::EntityCache;

/// Snapshot of sync state for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub is_online: bool,
    pub pending_count: usize,
    pub last_error: Option<String>,
    pub is_syncing: bool,
}

/// Why a drain did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoBackend,
    Offline,
    AlreadyRunning,
}

/// The action that halted a drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAction {
    pub id: String,
    pub action_type: ActionType,
    pub error: BackendError,
}

/// Outcome of one [`SyncMonitor::process_queue`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainReport {
    Skipped(SkipReason),
    Empty,
    Completed {
        synced: usize,
        skipped_unknown: usize,
        failed: Option<FailedAction>,
    },
}

impl DrainReport {
    /// Whether every queued action was handled.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        matches!(
            self,
            Self::Empty | Self::Completed { failed: None, .. }
        )
    }
}

/// Drains the action queue when connectivity allows.
pub struct SyncMonitor {
    queue: ActionQueue,
    cache: EntityCache,
    config: SyncConfig,
    backend: RwLock<Option<Arc<dyn RemoteBackend>>>,
    draining: AtomicBool,
    backend_ready: Notify,
    status: watch::Sender<SyncStatus>,
}

/// Releases the drain guard and clears `is_syncing`, including when a drain
/// future is dropped before finishing.
struct DrainGuard<'a>(&'a SyncMonitor);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.status.send_modify(|s| s.is_syncing = false);
        self.0.draining.store(false, Ordering::Release);
    }
}

impl SyncMonitor {
    #[must_use]
    pub fn new(queue: ActionQueue, cache: EntityCache, config: SyncConfig) -> Self {
        let status = SyncStatus {
            pending_count: queue.len(),
            ..SyncStatus::default()
        };
        let (status, _) = watch::channel(status);

        Self {
            queue,
            cache,
            config,
            backend: RwLock::new(None),
            draining: AtomicBool::new(false),
            backend_ready: Notify::new(),
            status,
        }
    }

    /// Make a backend handle available. A running monitor drains right away
    /// if it is online.
    pub fn attach_backend(&self, backend: Arc<dyn RemoteBackend>) {
        if let Ok(mut slot) = self.backend.write() {
            *slot = Some(backend);
        }
        self.backend_ready.notify_one();
    }

    /// Forget the backend handle (e.g. on logout). Drains become no-ops.
    pub fn detach_backend(&self) {
        if let Ok(mut slot) = self.backend.write() {
            *slot = None;
        }
    }

    fn backend(&self) -> Option<Arc<dyn RemoteBackend>> {
        self.backend.read().ok().and_then(|slot| slot.clone())
    }

    /// Current status snapshot.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.status.borrow().clone()
    }

    /// Subscribe to status changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.status.borrow().is_online
    }

    /// Record the platform connectivity signal. Returns `true` on an
    /// offline → online transition. Coming online clears `last_error`.
    pub fn set_online(&self, online: bool) -> bool {
        let mut came_online = false;
        self.status.send_modify(|s| {
            came_online = online && !s.is_online;
            s.is_online = online;
            if came_online {
                s.last_error = None;
            }
        });
        if came_online {
            info!("connectivity restored");
        } else if !online {
            debug!("offline");
        }
        came_online
    }

    /// Re-read the queue length into the status.
    pub fn refresh_pending_count(&self) {
        let pending = self.queue.len();
        self.status.send_if_modified(|s| {
            let changed = s.pending_count != pending;
            s.pending_count = pending;
            changed
        });
    }

    /// Manual retry: clear the error and drain immediately.
    pub async fn retry(&self) -> DrainReport {
        self.status.send_modify(|s| s.last_error = None);
        self.process_queue().await
    }

    /// Replay the queue against the backend, in order, stopping at the first
    /// rejection.
    ///
    /// No-op without a backend, while offline, or while another drain is in
    /// flight. Unknown action types are logged and dropped without halting.
    pub async fn process_queue(&self) -> DrainReport {
        let Some(backend) = self.backend() else {
            return DrainReport::Skipped(SkipReason::NoBackend);
        };
        if !self.is_online() {
            return DrainReport::Skipped(SkipReason::Offline);
        }
        if self
            .draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("drain already in progress");
            return DrainReport::Skipped(SkipReason::AlreadyRunning);
        }
        let _guard = DrainGuard(self);

        let snapshot = self.queue.get_queue();
        if snapshot.is_empty() {
            return DrainReport::Empty;
        }

        self.status.send_modify(|s| {
            s.is_syncing = true;
            s.last_error = None;
        });
        info!(pending = snapshot.len(), "draining action queue");

        let mut synced = 0;
        let mut skipped_unknown = 0;
        let mut failed = None;

        for action in &snapshot {
            match dispatch(backend.as_ref(), action).await {
                Ok(Dispatched::Applied) => {
                    self.queue.dequeue(&action.id);
                    synced += 1;
                },
                Ok(Dispatched::UnknownType) => {
                    warn!(id = %action.id, action = %action.action_type, "unknown action type, dropping");
                    self.queue.dequeue(&action.id);
                    skipped_unknown += 1;
                },
                Err(e) => {
                    let attempts = self.queue.bump_retry(&action.id).unwrap_or_default();
                    error!(
                        id = %action.id,
                        action = %action.action_type,
                        attempts,
                        error = %e,
                        "sync failed, halting drain"
                    );
                    let message = format!("Failed to sync {}", action.action_type);
                    self.status.send_modify(|s| s.last_error = Some(message));
                    failed = Some(FailedAction {
                        id: action.id.clone(),
                        action_type: action.action_type.clone(),
                        error: e,
                    });
                    break;
                },
            }
        }

        self.cache.invalidate_all();
        self.refresh_pending_count();
        info!(synced, skipped_unknown, halted = failed.is_some(), "drain finished");

        DrainReport::Completed {
            synced,
            skipped_unknown,
            failed,
        }
    }

    /// Drive the monitor from a connectivity signal until `shutdown`
    /// resolves.
    ///
    /// Drains on an offline → online transition (after the reconnect
    /// debounce), when a backend is attached while online, and once at
    /// start-up if already online. The pending count is refreshed on every
    /// poll tick regardless.
    pub async fn run<S>(&self, mut connectivity: watch::Receiver<bool>, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let online = *connectivity.borrow_and_update();
        self.set_online(online);
        self.refresh_pending_count();
        if online {
            self.process_queue().await;
        }

        let mut poll = tokio::time::interval(self.config.pending_poll_interval());
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                changed = connectivity.changed() => {
                    if changed.is_err() {
                        debug!("connectivity signal closed");
                        break;
                    }
                    let online = *connectivity.borrow_and_update();
                    if self.set_online(online) {
                        tokio::time::sleep(self.config.reconnect_debounce()).await;
                        let still_online = *connectivity.borrow_and_update();
                        self.set_online(still_online);
                        if still_online {
                            self.process_queue().await;
                        }
                    }
                },
                () = self.backend_ready.notified() => {
                    if self.is_online() {
                        self.process_queue().await;
                    }
                },
                _ = poll.tick() => self.refresh_pending_count(),
            }
        }
    }
}
