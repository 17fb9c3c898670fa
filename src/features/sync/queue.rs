//! Durable FIFO of pending actions.
//!
//! The whole queue is one JSON array under `<prefix>queue`. Every mutation is
//! a read-modify-write of that array, done under the store's exclusive guard
//! so concurrent enqueues and dequeues never overwrite each other.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use super::action::{NewAction, QueuedAction};
use crate::storage::PersistentStore;

/// Storage key (before prefixing) of the queue array.
pub const QUEUE_KEY: &str = "queue";

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Queue of actions that failed immediate execution.
#[derive(Clone)]
pub struct ActionQueue {
    store: PersistentStore,
}

impl ActionQueue {
    #[must_use]
    pub const fn new(store: PersistentStore) -> Self {
        Self { store }
    }

    /// Every pending action in enqueue order. Empty if nothing is stored or
    /// the stored queue is unreadable.
    #[must_use]
    pub fn get_queue(&self) -> Vec<QueuedAction> {
        self.store.get(QUEUE_KEY).unwrap_or_default()
    }

    /// Replace the stored queue in a single write.
    pub fn set_queue(&self, queue: &[QueuedAction]) {
        self.store.set(QUEUE_KEY, queue);
    }

    /// Append an action, assigning its id, timestamp and zero retry count.
    pub fn enqueue(&self, action: NewAction) -> QueuedAction {
        let _guard = self.store.exclusive();
        let mut queue = self.get_queue();
        let now = Utc::now().timestamp_millis();

        let mut id = generate_id(now);
        while queue.iter().any(|queued| queued.id == id) {
            id = generate_id(now);
        }

        let queued = QueuedAction {
            id,
            action_type: action.action_type,
            payload: action.payload,
            timestamp: now,
            retry_count: 0,
        };
        debug!(id = %queued.id, action = %queued.action_type, "enqueued action");

        queue.push(queued.clone());
        self.set_queue(&queue);
        queued
    }

    /// Remove the action with `id`. Returns whether it was present.
    pub fn dequeue(&self, id: &str) -> bool {
        let _guard = self.store.exclusive();
        let mut queue = self.get_queue();
        let before = queue.len();
        queue.retain(|queued| queued.id != id);

        if queue.len() == before {
            return false;
        }
        self.set_queue(&queue);
        true
    }

    /// Increment the retry count of `id`. Returns the new count.
    pub fn bump_retry(&self, id: &str) -> Option<u32> {
        let _guard = self.store.exclusive();
        let mut queue = self.get_queue();
        let queued = queue.iter_mut().find(|queued| queued.id == id)?;
        queued.retry_count = queued.retry_count.saturating_add(1);
        let count = queued.retry_count;

        self.set_queue(&queue);
        Some(count)
    }

    /// Look up a single action.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<QueuedAction> {
        self.get_queue().into_iter().find(|queued| queued.id == id)
    }

    /// The head of the queue, i.e. the next action a drain will replay.
    #[must_use]
    pub fn oldest(&self) -> Option<QueuedAction> {
        self.get_queue().into_iter().next()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.get_queue().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every pending action.
    pub fn clear(&self) {
        let _guard = self.store.exclusive();
        self.store.remove(QUEUE_KEY);
    }

    /// Summary for status displays.
    #[must_use]
    pub fn stats(&self) -> QueueStats {
        let queue = self.get_queue();
        QueueStats {
            pending: queue.len(),
            retried: queue.iter().filter(|q| q.retry_count > 0).count(),
            oldest_pending: queue.first().and_then(QueuedAction::queued_at),
        }
    }
}

/// Queue statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueStats {
    /// Number of pending actions
    pub pending: usize,
    /// Pending actions that have failed at least one replay
    pub retried: usize,
    /// Enqueue time of the head of the queue
    pub oldest_pending: Option<DateTime<Utc>>,
}

/// `<epochMillis>_<9 random base36 chars>`.
fn generate_id(now_millis: i64) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
        .collect();
    format!("{now_millis}_{suffix}")
}
