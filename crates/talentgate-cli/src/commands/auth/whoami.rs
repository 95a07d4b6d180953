//! Whoami command implementation.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;

use talentgate_core::{Clock, SessionProvider, SystemClock};

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(_args: WhoamiArgs) -> Result<()> {
    let manager = storage::require_session()?;
    let session = manager.current();

    if let Some(user) = &session.user {
        output::field("Email", &user.email);
        output::field("Role", user.role.as_str());
        output::field("User ID", &user.id);
    }
    output::field("API", manager.api().as_str());

    let remaining = session.seconds_until_expiry(SystemClock.now_epoch_seconds());
    let expires = DateTime::<Utc>::from_timestamp(session.exp, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| session.exp.to_string());
    if remaining > 0 {
        output::field(
            "Expires",
            &format!("{} (in {} min)", expires, remaining / 60),
        );
    } else {
        output::field("Expires", &format!("{} (expired, refreshed on next request)", expires));
    }

    Ok(())
}
