//! Session provider trait.

use async_trait::async_trait;

use crate::Result;
use crate::session::Session;

/// Owner of the application-wide session.
///
/// Refresh is the only mutation the executor triggers.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Returns a snapshot of the current session.
    fn current(&self) -> Session;

    /// Mint a new access token from the stored refresh token.
    ///
    /// A failed refresh may be reported either as `Err` or as `Ok` with a
    /// session carrying an error marker.
    async fn refresh(&self) -> Result<Session>;
}
