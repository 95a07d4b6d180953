//! talentgate-http - reqwest-backed collaborators for the request executor.
//!
//! [`HttpTransport`] performs the actual HTTP round trips and
//! [`RestSessionManager`] owns the session, talking to the backend's
//! `/auth/*` endpoints for sign-in, refresh and sign-out.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use talentgate_core::{ApiUrl, AuthenticatedRequestExecutor, Credentials, RequestDescriptor};
//! use talentgate_http::{HttpTransport, RestSessionManager};
//!
//! # async fn example() -> Result<(), talentgate_core::Error> {
//! let api = ApiUrl::new("https://api.example.org")?;
//! let manager = Arc::new(RestSessionManager::new(api.clone()));
//! manager.login(Credentials::new("manager@example.org", "secret")).await?;
//!
//! let executor = AuthenticatedRequestExecutor::new(manager, Arc::new(HttpTransport::new(api)));
//! let response = executor.execute(&RequestDescriptor::get("/cycles")).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

mod client;
mod endpoints;
pub mod jwt;
mod manager;
mod transport;

pub use manager::{REFRESH_ERROR, RestSessionManager};
pub use transport::HttpTransport;
