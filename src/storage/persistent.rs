//! Namespaced, best-effort JSON storage.
//!
//! Every key written through [`PersistentStore::get`]/[`PersistentStore::set`]
//! is prefixed so this application's data stays isolated from anything else
//! sharing the medium. Failures never reach the caller: reads degrade to
//! `None`, writes become no-ops. Each swallowed failure is logged and counted
//! so it stays observable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::kv::KvBackend;

/// Default namespace prefix for application keys.
pub const DEFAULT_PREFIX: &str = "frontline_";

/// Best-effort JSON store over a [`KvBackend`].
#[derive(Clone)]
pub struct PersistentStore {
    backend: Arc<dyn KvBackend>,
    prefix: String,
    diagnostics: Arc<Diagnostics>,
    exclusive: Arc<Mutex<()>>,
}

#[derive(Default)]
struct Diagnostics {
    failures: AtomicU64,
    last_failure: Mutex<Option<String>>,
}

impl PersistentStore {
    /// Create a store with the default prefix.
    #[must_use]
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self::with_prefix(backend, DEFAULT_PREFIX)
    }

    /// Create a store with a custom namespace prefix.
    #[must_use]
    pub fn with_prefix(backend: Arc<dyn KvBackend>, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
            diagnostics: Arc::new(Diagnostics::default()),
            exclusive: Arc::new(Mutex::new(())),
        }
    }

    /// The namespace prefix applied to every key.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Hold this across a read-modify-write of one key. Shared by every clone
    /// of the store, so handles built from clones exclude each other.
    #[must_use]
    pub fn exclusive(&self) -> MutexGuard<'_, ()> {
        self.exclusive.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    /// Read and decode the value under `key`. Absent or undecodable → `None`.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_raw_key(&self.namespaced(key))
    }

    /// Encode and write `value` under `key`.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        self.set_raw_key(&self.namespaced(key), value);
    }

    /// Delete `key`. Idempotent.
    pub fn remove(&self, key: &str) {
        self.remove_raw_key(&self.namespaced(key));
    }

    /// Read a key outside the namespace (shared with other collaborators).
    #[must_use]
    pub fn get_raw_key<T: DeserializeOwned>(&self, full_key: &str) -> Option<T> {
        let raw = match self.backend.get(full_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                self.record_failure("get", full_key, &e.to_string());
                return None;
            },
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                self.record_failure("decode", full_key, &e.to_string());
                None
            },
        }
    }

    /// Write a key outside the namespace.
    pub fn set_raw_key<T: Serialize + ?Sized>(&self, full_key: &str, value: &T) {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                self.record_failure("encode", full_key, &e.to_string());
                return;
            },
        };

        if let Err(e) = self.backend.set(full_key, &encoded) {
            self.record_failure("set", full_key, &e.to_string());
        }
    }

    /// Delete a key outside the namespace.
    pub fn remove_raw_key(&self, full_key: &str) {
        if let Err(e) = self.backend.remove(full_key) {
            self.record_failure("remove", full_key, &e.to_string());
        }
    }

    /// Wipe the whole medium, namespaced and foreign keys alike.
    pub fn clear_all(&self) {
        if let Err(e) = self.backend.clear() {
            self.record_failure("clear", "*", &e.to_string());
        }
    }

    /// Keys currently stored inside this store's namespace, prefix stripped.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        match self.backend.keys() {
            Ok(keys) => keys
                .into_iter()
                .filter_map(|k| k.strip_prefix(&self.prefix).map(String::from))
                .collect(),
            Err(e) => {
                self.record_failure("keys", "*", &e.to_string());
                Vec::new()
            },
        }
    }

    /// Number of storage failures swallowed since this store was created.
    #[must_use]
    pub fn failure_count(&self) -> u64 {
        self.diagnostics.failures.load(Ordering::Relaxed)
    }

    /// Description of the most recent swallowed failure.
    #[must_use]
    pub fn last_failure(&self) -> Option<String> {
        self.diagnostics
            .last_failure
            .lock()
            .ok()
            .and_then(|last| last.clone())
    }

    fn record_failure(&self, op: &str, key: &str, error: &str) {
        warn!(op, key, error, "storage operation failed");
        self.diagnostics.failures.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.diagnostics.last_failure.lock() {
            *last = Some(format!("{op} {key}: {error}"));
        }
    }
}
