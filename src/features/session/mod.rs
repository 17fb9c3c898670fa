//! Authenticated session state.
//!
//! The session lives under its own unprefixed key so it shares the storage
//! medium with the sync core without sharing its namespace. A full reset
//! wipes it along with everything else.

pub mod state;

pub use state::{AuthSession, Role, SESSION_KEY};
