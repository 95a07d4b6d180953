//! Request command implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use clap::Args;

use talentgate_core::{AuthenticatedRequestExecutor, Method, RequestDescriptor, SignOutBoundary};
use talentgate_http::HttpTransport;

use crate::output;
use crate::session::{CliSignOut, storage};

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    pub method: String,

    /// Path relative to the API base URL, or an absolute URL
    pub path: String,

    /// Extra header as 'Name: value' (repeatable)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Request body; sent as JSON when it parses as JSON
    #[arg(short, long)]
    pub data: Option<String>,

    /// Do not refresh and retry after a 401
    #[arg(long)]
    pub no_retry: bool,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

pub async fn run(args: RequestArgs) -> Result<()> {
    let manager = storage::require_session()?;
    let descriptor = build_descriptor(&args)?;

    let transport = match args.timeout {
        Some(secs) => HttpTransport::with_timeout(manager.api().clone(), Duration::from_secs(secs)),
        None => HttpTransport::new(manager.api().clone()),
    };
    let executor = AuthenticatedRequestExecutor::new(Arc::new(manager.clone()), Arc::new(transport));
    let boundary = SignOutBoundary::new(executor, Arc::new(CliSignOut::new(manager.clone())));

    let max_retries = if args.no_retry { 0 } else { 1 };
    let result = boundary.execute_with_retries(&descriptor, max_retries).await;

    // Tokens may have rotated even when the request itself failed. After a
    // forced sign-out the manager is signed out and this removes the file.
    storage::save_session(&manager).context("Failed to save session")?;

    let response = result.context("Request failed")?;

    output::status(response.status);
    let body = response.text();
    if !body.is_empty() {
        println!("{}", body);
    }

    if !response.is_success() {
        bail!("Backend answered with HTTP {}", response.status);
    }

    Ok(())
}

fn build_descriptor(args: &RequestArgs) -> Result<RequestDescriptor> {
    let method: Method = args.method.parse().context("Invalid HTTP method")?;
    let mut descriptor = RequestDescriptor::new(method, &args.path);

    for raw in &args.headers {
        let (name, value) = parse_header(raw)?;
        descriptor = descriptor.header(name, value);
    }

    if let Some(data) = &args.data {
        descriptor = match serde_json::from_str::<serde_json::Value>(data) {
            Ok(json) => descriptor.json(&json).context("Invalid JSON body")?,
            Err(_) => descriptor.body(data.as_bytes()),
        };
    }

    Ok(descriptor)
}

fn parse_header(raw: &str) -> Result<(&str, &str)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("Header '{}' must look like 'Name: value'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        bail!("Header '{}' has an empty name", raw);
    }
    Ok((name, value.trim()))
}
