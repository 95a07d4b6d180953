//! Backend auth endpoint paths and payloads.

use serde::{Deserialize, Serialize};

use talentgate_core::{SessionUser, UserRole};

/// Exchange email and password for a token pair.
pub const LOGIN: &str = "/auth/login";

/// Exchange a refresh token for a new access token.
pub const REFRESH: &str = "/auth/refresh";

/// Revoke the current session.
pub const LOGOUT: &str = "/auth/logout";

/// Request body for login.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Request body for refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Token pair returned by login and refresh.
///
/// The backend may send an absolute `exp`, a relative `expiresIn`, or
/// neither (the JWT's own claim is used then).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub user: Option<UserPayload>,
}

/// User block of a token response.
#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub id: serde_json::Value,
    pub email: String,
    pub role: UserRole,
}

impl From<UserPayload> for SessionUser {
    fn from(user: UserPayload) -> Self {
        let id = match user.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        SessionUser {
            id,
            email: user.email,
            role: user.role,
        }
    }
}

/// Error body the backend sends with non-2xx answers.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}
