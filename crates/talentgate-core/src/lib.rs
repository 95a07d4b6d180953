//! talentgate-core - Session-aware request execution for the talentgate backend.
//!
//! Every authenticated call to the recruitment backend flows through an
//! [`AuthenticatedRequestExecutor`]. The executor attaches the bearer
//! credential, refreshes it ahead of expiry, and retries once after a 401.
//! Collaborators (session storage, HTTP, sign-out) are injected as traits so
//! the executor can run without a live backend.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use talentgate_core::{
//!     AuthenticatedRequestExecutor, Method, RequestDescriptor, SessionProvider, Transport,
//! };
//!
//! # async fn example<P: SessionProvider, T: Transport>(
//! #     provider: Arc<P>,
//! #     transport: Arc<T>,
//! # ) -> Result<(), talentgate_core::Error> {
//! let executor = AuthenticatedRequestExecutor::new(provider, transport);
//! let response = executor
//!     .execute(&RequestDescriptor::new(Method::Get, "/applications?status=submitted"))
//!     .await?;
//! println!("status {}", response.status);
//! # Ok(())
//! # }
//! ```

pub mod boundary;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod refresh;
pub mod request;
pub mod session;
pub mod tokens;
pub mod traits;
pub mod types;

pub use boundary::SignOutBoundary;
pub use credentials::Credentials;
pub use error::{AuthError, Error};
pub use executor::{AuthenticatedRequestExecutor, ExecutorConfig};
pub use refresh::RefreshCoordinator;
pub use request::{Headers, Method, PreparedRequest, RequestDescriptor, Response};
pub use session::{AuthenticationStatus, Session, SessionUser};
pub use tokens::{AccessToken, RefreshToken};
pub use traits::{Clock, SessionProvider, SignOutHandler, SystemClock, Transport};
pub use types::{ApiUrl, UserRole};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
