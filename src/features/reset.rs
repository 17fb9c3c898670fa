//! Full local reset.
//!
//! Used on "clear data" and when a user signs out of a shared terminal.

use tracing::info;

use crate::storage::PersistentStore;

/// Wipe every key in the storage medium: the action queue, cached
/// collections and the auth session.
///
/// Best-effort and idempotent. Storage failures are logged by the store and
/// never surface here.
pub fn reset_local_state(store: &PersistentStore) {
    let before = store.failure_count();
    store.clear_all();

    if store.failure_count() == before {
        info!("local state cleared");
    }
}
