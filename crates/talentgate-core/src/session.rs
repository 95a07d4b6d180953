//! Session state consumed by the request executor.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tokens::{AccessToken, RefreshToken};
use crate::types::UserRole;

/// Where the auth layer currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthenticationStatus {
    Loading,
    Authenticated,
    Unauthenticated,
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub role: UserRole,
}

/// A snapshot of the session owned by a [`SessionProvider`](crate::SessionProvider).
///
/// The executor reads snapshots and asks the provider to refresh; it never
/// writes to a session itself.
#[derive(Clone)]
pub struct Session {
    pub access_token: Option<AccessToken>,
    pub refresh_token: Option<RefreshToken>,
    /// Absolute expiry of the access token, seconds since epoch.
    pub exp: i64,
    pub status: AuthenticationStatus,
    /// Failure marker left by a refresh attempt.
    pub error: Option<String>,
    pub user: Option<SessionUser>,
}

impl Session {
    /// A freshly signed-in session.
    pub fn authenticated(
        access_token: AccessToken,
        refresh_token: Option<RefreshToken>,
        exp: i64,
    ) -> Self {
        Self {
            access_token: Some(access_token),
            refresh_token,
            exp,
            status: AuthenticationStatus::Authenticated,
            error: None,
            user: None,
        }
    }

    /// A signed-out session.
    pub fn unauthenticated() -> Self {
        Self {
            access_token: None,
            refresh_token: None,
            exp: 0,
            status: AuthenticationStatus::Unauthenticated,
            error: None,
            user: None,
        }
    }

    pub fn with_user(mut self, user: SessionUser) -> Self {
        self.user = Some(user);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == AuthenticationStatus::Authenticated
    }

    /// The access token, if one is present and non-empty.
    pub fn usable_access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref().filter(|t| !t.is_empty())
    }

    /// Whether a refresh left this session with a token worth sending.
    pub fn has_usable_access_token(&self) -> bool {
        self.error.is_none() && self.usable_access_token().is_some()
    }

    /// The refresh token, if one is present and non-empty.
    pub fn usable_refresh_token(&self) -> Option<&RefreshToken> {
        self.refresh_token.as_ref().filter(|t| !t.is_empty())
    }

    /// Seconds until the access token expires; negative once expired.
    ///
    /// Saturates: `exp` comes from the backend or the session file.
    pub fn seconds_until_expiry(&self, now: i64) -> i64 {
        self.exp.saturating_sub(now)
    }

    /// True when fewer than `margin_secs` seconds remain before expiry.
    pub fn expires_within(&self, now: i64, margin_secs: i64) -> bool {
        self.seconds_until_expiry(now) < margin_secs
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.status)
            .field("exp", &self.exp)
            .field("error", &self.error)
            .field("user", &self.user)
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
