//! Feature implementations for frontline.
//!
//! - Offline action queue and sync
//! - Authenticated session
//! - Local reset

pub mod reset;
pub mod session;
pub mod sync;

pub use reset::reset_local_state;
