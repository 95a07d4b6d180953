//! Logout command implementation.

use anyhow::Result;
use clap::Args;
use tracing::warn;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(_args: LogoutArgs) -> Result<()> {
    let Some(manager) = storage::load_session()? else {
        output::success("Not signed in");
        return Ok(());
    };

    if let Err(e) = manager.logout().await {
        warn!(error = %e, "Backend sign-out failed");
    }
    storage::clear_session()?;

    output::success("Signed out");

    Ok(())
}
