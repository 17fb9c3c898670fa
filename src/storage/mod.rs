//! Storage layer for frontline.
//!
//! This module provides local persistence for:
//! - The pending action queue (offline mutations)
//! - Cached entity collections (products, customers, bills, expenses)
//! - The auth session shared with the login flow

mod cache;
mod database;
mod kv;
mod migrations;
mod persistent;

pub use cache::{CacheKey, CachedEntity, EntityCache};
pub use database::Database;
pub use kv::{KvBackend, MemoryKv, SqliteKv};
pub use persistent::{PersistentStore, DEFAULT_PREFIX};
