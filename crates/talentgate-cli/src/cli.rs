//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::auth::AuthCommand;
use crate::commands::request::RequestArgs;

/// Command-line client for the talentgate recruitment backend.
#[derive(Parser, Debug)]
#[command(name = "talentgate")]
#[command(author, version = env!("TALENTGATE_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in, inspect, refresh or end the stored session
    Auth(AuthCommand),

    /// Send an authenticated request to the backend
    Request(RequestArgs),
}
