//! Local snapshots of remote-owned collections.
//!
//! Reads are local-first; freshness is the caller's call (no eviction).
//! A successful drain invalidates every collection so the next read goes
//! back to the backend.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::PersistentStore;

/// A cached value and the time it was written (ms since epoch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedEntity<T> {
    pub data: T,
    pub timestamp: i64,
}

/// Collections that have a cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Products,
    Customers,
    Bills,
    Expenses,
}

impl CacheKey {
    pub const ALL: [Self; 4] = [Self::Products, Self::Customers, Self::Bills, Self::Expenses];

    /// Storage key (without namespace prefix).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Customers => "customers",
            Self::Bills => "bills",
            Self::Expenses => "expenses",
        }
    }

    /// Parse a collection name as typed on the command line.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed access to cached collections.
#[derive(Clone)]
pub struct EntityCache {
    store: PersistentStore,
}

impl EntityCache {
    #[must_use]
    pub const fn new(store: PersistentStore) -> Self {
        Self { store }
    }

    /// Overwrite the snapshot for `key`, stamping it with the current time.
    pub fn put<T: Serialize>(&self, key: CacheKey, data: T) {
        let cached = CachedEntity {
            data,
            timestamp: Utc::now().timestamp_millis(),
        };
        self.store.set(key.as_str(), &cached);
    }

    /// The cached data for `key`, if any.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: CacheKey) -> Option<T> {
        self.entry(key).map(|cached| cached.data)
    }

    /// The full cache entry for `key`, including its write time.
    #[must_use]
    pub fn entry<T: DeserializeOwned>(&self, key: CacheKey) -> Option<CachedEntity<T>> {
        self.store.get(key.as_str())
    }

    /// Drop the snapshot for `key`.
    pub fn invalidate(&self, key: CacheKey) {
        self.store.remove(key.as_str());
    }

    /// Drop every collection snapshot.
    pub fn invalidate_all(&self) {
        for key in CacheKey::ALL {
            self.invalidate(key);
        }
    }
}
