//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use talentgate_core::{ApiUrl, Credentials};
use talentgate_http::RestSessionManager;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "TALENTGATE_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Backend base URL
    #[arg(long, env = "TALENTGATE_API", default_value = "http://localhost:8000")]
    pub api: String,
}

pub async fn run(args: LoginArgs) -> Result<()> {
    let api = ApiUrl::new(&args.api).context("Invalid API URL")?;
    let credentials = Credentials::new(&args.email, &args.password);

    eprintln!("{}", "Signing in...".dimmed());

    let manager = RestSessionManager::new(api);
    let session = manager
        .login(credentials)
        .await
        .context("Failed to sign in")?;

    storage::save_session(&manager).context("Failed to save session")?;

    output::success("Signed in successfully");
    println!();
    output::field("Email", &args.email);
    if let Some(user) = &session.user {
        output::field("Role", user.role.as_str());
    }
    output::field("API", manager.api().as_str());

    Ok(())
}
