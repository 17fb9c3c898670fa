//! Try-now, queue-on-failure execution of mutations.
//!
//! Every mutation is attempted against the backend straight away regardless
//! of any connectivity flag. Only a failed attempt is written to the queue,
//! and the original error still goes back to the caller.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::info;

use super::action::{NewAction, QueuedAction};
use super::backend::{dispatch, RemoteBackend};
use super::queue::ActionQueue;
use crate::error::BackendError;

/// Runs mutations optimistically and queues the ones that fail.
#[derive(Clone)]
pub struct OfflineExecutor {
    queue: ActionQueue,
    in_flight: Arc<AtomicUsize>,
}

/// Decrements the in-flight counter even if the attempt is dropped midway.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl OfflineExecutor {
    #[must_use]
    pub fn new(queue: ActionQueue) -> Self {
        Self {
            queue,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Run `execute` now. On success nothing is queued; on failure `action`
    /// is queued for replay and the original error is returned.
    ///
    /// # Errors
    ///
    /// Returns whatever `execute` returned.
    pub async fn queue_action<F, Fut, T, E>(&self, action: NewAction, execute: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let _in_flight = InFlight::enter(&self.in_flight);

        match execute().await {
            Ok(value) => Ok(value),
            Err(e) => {
                info!(action = %action.action_type, error = %e, "action failed, queueing for retry");
                self.queue.enqueue(action);
                Err(e)
            },
        }
    }

    /// [`queue_action`](Self::queue_action) with the backend call derived
    /// from the action itself.
    ///
    /// # Errors
    ///
    /// Returns the backend rejection after queueing the action.
    pub async fn submit(
        &self,
        backend: &dyn RemoteBackend,
        action: NewAction,
    ) -> Result<(), BackendError> {
        let attempt = QueuedAction {
            id: String::new(),
            action_type: action.action_type.clone(),
            payload: action.payload.clone(),
            timestamp: 0,
            retry_count: 0,
        };

        self.queue_action(action, || async move {
            dispatch(backend, &attempt).await.map(|_| ())
        })
        .await
    }

    /// Whether an immediate attempt is in progress.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Number of queued actions awaiting replay.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }
}
