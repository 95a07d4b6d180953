//! Authenticated request execution.
//!
//! One invocation moves through these states:
//!
//! ```text
//! START -> not authenticated ------------------------> NotAuthenticated
//!       -> near expiry -> REFRESH -fail--------------> SessionExpired
//!                               -ok--> SEND
//!       -> otherwise ----------------> SEND
//! SEND  -> 401 and retryable -> REFRESH -fail--------> SessionExpired
//!                                       -ok--> SEND -> RETURN
//!       -> 401, not retryable ----------------------> SessionExpired
//!       -> anything else ---------------------------> RETURN
//! ```
//!
//! The executor has no side effects on failure. Signing the user out is the
//! job of [`SignOutBoundary`](crate::SignOutBoundary).

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::error::AuthError;
use crate::refresh::RefreshCoordinator;
use crate::request::{RequestDescriptor, Response};
use crate::session::Session;
use crate::tokens::AccessToken;
use crate::traits::{Clock, SessionProvider, SystemClock, Transport};

/// Lookahead before expiry that triggers a proactive refresh.
pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::from_secs(30);

/// Executor tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Refresh before sending when less than this remains on the token.
    pub refresh_margin: Duration,
    /// Retry budget for 401 answers. Anything above zero allows exactly one
    /// refresh-and-retry.
    pub max_retries: u32,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            refresh_margin: DEFAULT_REFRESH_MARGIN,
            max_retries: 1,
        }
    }
}

impl ExecutorConfig {
    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn margin_secs(&self) -> i64 {
        i64::try_from(self.refresh_margin.as_secs()).unwrap_or(i64::MAX)
    }
}

/// Runs requests with a valid bearer credential.
///
/// Cheap to clone; clones share the refresh gate, so concurrent requests
/// through any clone refresh at most once per stale token.
pub struct AuthenticatedRequestExecutor<P: ?Sized, T: ?Sized> {
    refresher: Arc<RefreshCoordinator<P>>,
    transport: Arc<T>,
    clock: Arc<dyn Clock>,
    config: ExecutorConfig,
}

impl<P, T> AuthenticatedRequestExecutor<P, T>
where
    P: SessionProvider + ?Sized,
    T: Transport + ?Sized,
{
    pub fn new(provider: Arc<P>, transport: Arc<T>) -> Self {
        Self {
            refresher: Arc::new(RefreshCoordinator::new(provider)),
            transport,
            clock: Arc::new(SystemClock),
            config: ExecutorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn provider(&self) -> &Arc<P> {
        self.refresher.provider()
    }

    /// Execute with the configured retry budget.
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<Response> {
        self.execute_with_retries(descriptor, self.config.max_retries)
            .await
    }

    /// Execute one request.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NotAuthenticated`] when there is no authenticated
    ///   session with an access token. Nothing is sent.
    /// - [`AuthError::SessionExpired`] when a refresh fails, or a 401 cannot
    ///   be retried.
    /// - Transport errors from the underlying HTTP call, unchanged.
    #[instrument(skip(self, descriptor), fields(method = %descriptor.method, url = %descriptor.url))]
    pub async fn execute_with_retries(
        &self,
        descriptor: &RequestDescriptor,
        max_retries: u32,
    ) -> Result<Response> {
        let session = self.provider().current();
        let Some(token) = authenticated_token(&session) else {
            warn!(status = ?session.status, "No authenticated session");
            return Err(AuthError::NotAuthenticated.into());
        };

        let now = self.clock.now_epoch_seconds();
        let session = if session.expires_within(now, self.config.margin_secs()) {
            info!(
                expires_in = session.seconds_until_expiry(now),
                "Access token near expiry, refreshing before send"
            );
            self.refresh_or_expire(&token).await?
        } else {
            session
        };
        let token = session.usable_access_token().cloned().unwrap_or(token);

        let response = self.transport.send(&descriptor.prepare(&token)).await?;
        if !response.is_unauthorized() {
            debug!(status = response.status, "Request completed");
            return Ok(response);
        }

        if max_retries == 0 {
            warn!("Request unauthorized and retries disabled");
            return Err(AuthError::SessionExpired.into());
        }
        if session.usable_refresh_token().is_none() {
            warn!("Request unauthorized and no refresh token available");
            return Err(AuthError::SessionExpired.into());
        }

        info!("Request unauthorized, refreshing session and retrying once");
        let session = self.refresh_or_expire(&token).await?;
        let token = session
            .usable_access_token()
            .cloned()
            .ok_or(AuthError::SessionExpired)?;

        let response = self.transport.send(&descriptor.prepare(&token)).await?;
        debug!(status = response.status, "Retried request completed");
        Ok(response)
    }

    /// Refresh through the coordinator; anything short of a usable token is
    /// an expired session.
    async fn refresh_or_expire(&self, stale: &AccessToken) -> Result<Session> {
        match self.refresher.refresh(Some(stale)).await {
            Ok(session) if session.has_usable_access_token() => Ok(session),
            Ok(session) => {
                warn!(error = ?session.error, "Refresh returned no usable access token");
                Err(AuthError::SessionExpired.into())
            }
            Err(err) => {
                warn!(error = %err, "Session refresh failed");
                Err(AuthError::SessionExpired.into())
            }
        }
    }
}

fn authenticated_token(session: &Session) -> Option<AccessToken> {
    if !session.is_authenticated() {
        return None;
    }
    session.usable_access_token().cloned()
}

impl<P: ?Sized, T: ?Sized> Clone for AuthenticatedRequestExecutor<P, T> {
    fn clone(&self) -> Self {
        Self {
            refresher: Arc::clone(&self.refresher),
            transport: Arc::clone(&self.transport),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
        }
    }
}

impl<P: ?Sized, T: ?Sized> std::fmt::Debug for AuthenticatedRequestExecutor<P, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedRequestExecutor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
