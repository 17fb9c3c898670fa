//! Session persistence and role validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::FrontlineError;
use crate::storage::PersistentStore;

/// Unprefixed storage key holding the session.
pub const SESSION_KEY: &str = "password_auth_state";

/// Who is operating the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including reports and settings
    Owner,
    /// Field sales: billing and customer lookups
    Salesman,
}

impl Role {
    /// Parse a role name.
    ///
    /// # Errors
    ///
    /// Returns `FrontlineError::Auth` for anything other than `owner` or
    /// `salesman`.
    pub fn parse(s: &str) -> Result<Self, FrontlineError> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "salesman" => Ok(Self::Salesman),
            other => Err(FrontlineError::Auth(format!("unknown role: {other}"))),
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Salesman => "salesman",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored shape of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    is_authenticated: bool,
    role: Role,
}

/// Persisted login state.
#[derive(Clone)]
pub struct AuthSession {
    store: PersistentStore,
    role: Option<Role>,
}

impl AuthSession {
    /// Load the stored session.
    ///
    /// A session is kept only if it is marked authenticated and carries a
    /// known role. Anything else is treated as stale and its key removed.
    #[must_use]
    pub fn restore(store: PersistentStore) -> Self {
        let role = match store.get_raw_key::<Value>(SESSION_KEY) {
            None => None,
            Some(raw) => match serde_json::from_value::<StoredSession>(raw) {
                Ok(StoredSession {
                    is_authenticated: true,
                    role,
                }) => {
                    debug!(%role, "restored session");
                    Some(role)
                },
                Ok(_) => {
                    debug!("stored session is signed out, removing it");
                    store.remove_raw_key(SESSION_KEY);
                    None
                },
                Err(e) => {
                    warn!(error = %e, "discarding malformed session");
                    store.remove_raw_key(SESSION_KEY);
                    None
                },
            },
        };

        Self { store, role }
    }

    /// Sign in as `role` and persist the session.
    pub fn login(&mut self, role: Role) {
        self.store.set_raw_key(
            SESSION_KEY,
            &StoredSession {
                is_authenticated: true,
                role,
            },
        );
        self.role = Some(role);
        info!(%role, "signed in");
    }

    /// Sign out and forget the stored session.
    pub fn logout(&mut self) {
        self.store.remove_raw_key(SESSION_KEY);
        if self.role.take().is_some() {
            info!("signed out");
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.role.is_some()
    }

    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        self.role
    }
}
