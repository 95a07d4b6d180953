//! Refresh token command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;

use talentgate_core::SessionProvider;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct RefreshTokenArgs {}

pub async fn run(_args: RefreshTokenArgs) -> Result<()> {
    let manager = storage::require_session()?;

    eprintln!("{}", "Refreshing session...".dimmed());

    let session = manager
        .refresh()
        .await
        .context("Failed to refresh session")?;

    if !session.has_usable_access_token() {
        storage::clear_session()?;
        bail!("Session could not be refreshed. Run 'talentgate auth login' to sign in again.");
    }

    storage::save_session(&manager).context("Failed to save refreshed session")?;

    output::success("Session refreshed successfully");

    Ok(())
}
