//! Domain records owned by the remote backend.
//!
//! The sync core only moves these around as payloads and cache snapshots;
//! pricing, GST and credit arithmetic live elsewhere.

pub mod types;

pub use types::*;
