//! Raw key-value backends.
//!
//! A [`KvBackend`] stores opaque strings under string keys. It knows nothing
//! about prefixes or JSON; [`super::PersistentStore`] layers both on top.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::FrontlineError;

/// A durable (or ephemeral) string key-value medium.
///
/// Every operation is an independent write; there are no transactions
/// spanning keys.
pub trait KvBackend: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, FrontlineError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), FrontlineError>;

    /// Delete `key`. Deleting an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), FrontlineError>;

    /// List every key in the medium, in ascending order.
    fn keys(&self) -> Result<Vec<String>, FrontlineError>;

    /// Delete every key in the medium.
    fn clear(&self) -> Result<(), FrontlineError>;
}

/// `SQLite`-backed medium using the `kv_store` table.
pub struct SqliteKv {
    db: Mutex<Database>,
}

impl SqliteKv {
    /// Wrap an open database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// Open the database at the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open() -> Result<Self, FrontlineError> {
        Ok(Self::new(Database::open()?))
    }

    fn with_db<T>(
        &self,
        f: impl FnOnce(&Database) -> Result<T, FrontlineError>,
    ) -> Result<T, FrontlineError> {
        let db = self
            .db
            .lock()
            .map_err(|_| FrontlineError::Database("database lock poisoned".to_string()))?;
        f(&db)
    }
}

impl KvBackend for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>, FrontlineError> {
        self.with_db(|db| {
            db.connection()
                .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                    row.get(0)
                })
                .optional()
                .map_err(|e| FrontlineError::Database(format!("Failed to read {key}: {e}")))
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), FrontlineError> {
        self.with_db(|db| {
            db.connection()
                .execute(
                    r"INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                      ON CONFLICT(key) DO UPDATE SET
                      value = excluded.value,
                      updated_at = excluded.updated_at",
                    params![key, value, Utc::now().to_rfc3339()],
                )
                .map_err(|e| FrontlineError::Database(format!("Failed to write {key}: {e}")))?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<(), FrontlineError> {
        self.with_db(|db| {
            db.connection()
                .execute("DELETE FROM kv_store WHERE key = ?1", [key])
                .map_err(|e| FrontlineError::Database(format!("Failed to remove {key}: {e}")))?;
            Ok(())
        })
    }

    fn keys(&self) -> Result<Vec<String>, FrontlineError> {
        self.with_db(|db| {
            let mut stmt = db
                .connection()
                .prepare("SELECT key FROM kv_store ORDER BY key ASC")
                .map_err(|e| FrontlineError::Database(format!("Failed to prepare query: {e}")))?;

            let rows = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(|e| FrontlineError::Database(format!("Failed to list keys: {e}")))?;

            let mut keys = Vec::new();
            for row in rows {
                keys.push(row.map_err(|e| FrontlineError::Database(e.to_string()))?);
            }
            Ok(keys)
        })
    }

    fn clear(&self) -> Result<(), FrontlineError> {
        self.with_db(|db| {
            db.connection()
                .execute("DELETE FROM kv_store", [])
                .map_err(|e| FrontlineError::Database(format!("Failed to clear store: {e}")))?;
            Ok(())
        })
    }
}

/// In-process medium. Contents vanish with the process.
#[derive(Default)]
pub struct MemoryKv {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> T,
    ) -> Result<T, FrontlineError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| FrontlineError::Database("memory store lock poisoned".to_string()))?;
        Ok(f(&mut entries))
    }
}

impl KvBackend for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, FrontlineError> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), FrontlineError> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), FrontlineError> {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }

    fn keys(&self) -> Result<Vec<String>, FrontlineError> {
        self.with_entries(|entries| entries.keys().cloned().collect())
    }

    fn clear(&self) -> Result<(), FrontlineError> {
        self.with_entries(BTreeMap::clear)
    }
}
