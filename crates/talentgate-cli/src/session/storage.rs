//! Session storage for persisting sign-in state between invocations.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use talentgate_core::{AccessToken, ApiUrl, RefreshToken, Session, SessionProvider, SessionUser};
use talentgate_http::RestSessionManager;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored session data.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    api: String,
    access_token: String,
    refresh_token: Option<String>,
    exp: i64,
    #[serde(default)]
    user: Option<SessionUser>,
}

/// Get the session file path.
fn session_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "talentgate").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("session.json"))
}

/// Save the manager's current session to disk.
///
/// A signed-out or failed-refresh session removes the file instead.
pub fn save_session(manager: &RestSessionManager) -> Result<()> {
    let session = manager.current();
    let access_token = match session.usable_access_token() {
        Some(token) if session.error.is_none() => token,
        _ => return clear_session(),
    };

    let stored = StoredSession {
        api: manager.api().to_string(),
        access_token: access_token.as_str().to_string(),
        refresh_token: session.refresh_token.as_ref().map(|t| t.as_str().to_string()),
        exp: session.exp,
        user: session.user.clone(),
    };

    let path = session_path()?;
    let json = serde_json::to_string_pretty(&stored)?;

    fs::write(&path, &json).context("Failed to write session file")?;

    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    Ok(())
}

/// Load a session from disk.
pub fn load_session() -> Result<Option<RestSessionManager>> {
    let path = session_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path).context("Failed to read session file")?;
    let stored: StoredSession = serde_json::from_str(&json).context("Invalid session file")?;

    let api = ApiUrl::new(&stored.api).context("Invalid API URL in session")?;
    let mut session = Session::authenticated(
        AccessToken::new(stored.access_token),
        stored.refresh_token.map(RefreshToken::new),
        stored.exp,
    );
    session.user = stored.user;

    Ok(Some(RestSessionManager::from_persisted(api, session)))
}

/// Load a session or fail with a hint to sign in.
pub fn require_session() -> Result<RestSessionManager> {
    load_session()
        .context("Failed to load session")?
        .context("No active session. Run 'talentgate auth login' first.")
}

/// Clear the stored session.
pub fn clear_session() -> Result<()> {
    let path = session_path()?;

    if path.exists() {
        fs::remove_file(&path).context("Failed to remove session file")?;
    }

    Ok(())
}
