//! Forced sign-out hooks.

use async_trait::async_trait;

/// Side effects run when credentials cannot be recovered.
#[async_trait]
pub trait SignOutHandler: Send + Sync {
    /// Clear local session state, optionally telling the backend.
    async fn terminate_session(&self);

    /// Send the user to the sign-in entry point.
    fn redirect_to_sign_in(&self);
}
