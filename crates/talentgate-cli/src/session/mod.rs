//! Session persistence and the CLI's forced sign-out.

pub mod storage;

use async_trait::async_trait;
use tracing::warn;

use talentgate_core::SignOutHandler;
use talentgate_http::RestSessionManager;

use crate::output;

/// Forced sign-out for the CLI: end the session on the backend, forget the
/// stored tokens, and point the user back at `auth login`.
pub struct CliSignOut {
    manager: RestSessionManager,
}

impl CliSignOut {
    pub fn new(manager: RestSessionManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl SignOutHandler for CliSignOut {
    async fn terminate_session(&self) {
        if let Err(e) = self.manager.logout().await {
            warn!(error = %e, "Backend sign-out failed");
        }
        if let Err(e) = storage::clear_session() {
            warn!(error = %e, "Failed to remove stored session");
        }
    }

    fn redirect_to_sign_in(&self) {
        output::error("Your session has ended. Run 'talentgate auth login' to sign in again.");
    }
}
