//! The authentication state value published by the store.

use crate::claims::Claims;
use crate::session_fsm::SessionPhase;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of the current session.
///
/// Always replaced as a whole; the store never mutates a published value.
/// `is_authenticated` is true exactly when `token` is non-empty.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// True once a session is installed.
    pub is_authenticated: bool,
    /// `sub` claim of the token; empty when unauthenticated.
    pub subject: String,
    /// `exp` claim of the token (epoch seconds); 0 when unauthenticated.
    pub expires_at: i64,
    /// Login identifier supplied by the caller; empty when unauthenticated.
    pub username: String,
    /// Raw token; empty when unauthenticated.
    pub token: String,
}

impl AuthState {
    /// The unauthenticated default `{false, "", 0, "", ""}`.
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    /// Build the authenticated state for a decoded token.
    pub(crate) fn from_session(username: &str, token: &str, claims: Claims) -> Self {
        Self {
            is_authenticated: true,
            subject: claims.sub,
            expires_at: claims.exp,
            username: username.to_string(),
            token: token.to_string(),
        }
    }

    /// Phase this state belongs to.
    pub fn phase(&self) -> SessionPhase {
        if self.is_authenticated {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Unauthenticated
        }
    }

    /// Whether the authentication flag agrees with the token.
    pub fn is_consistent(&self) -> bool {
        self.is_authenticated != self.token.is_empty()
    }
}

// Keeps raw tokens out of logs and panic messages.
impl fmt::Debug for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthState")
            .field("is_authenticated", &self.is_authenticated)
            .field("subject", &self.subject)
            .field("expires_at", &self.expires_at)
            .field("username", &self.username)
            .field("token", &format_args!("<{} bytes>", self.token.len()))
            .finish()
    }
}
