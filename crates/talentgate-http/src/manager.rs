//! REST-backed session manager.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use talentgate_core::error::AuthError;
use talentgate_core::{
    AccessToken, ApiUrl, AuthenticationStatus, Clock, Credentials, Error, RefreshToken, Result,
    Session, SessionProvider, SessionUser, SystemClock,
};

use crate::client::{ApiClient, build_http_client};
use crate::endpoints::{LOGIN, LOGOUT, LoginRequest, REFRESH, RefreshRequest, TokenResponse};
use crate::jwt;

/// Error marker left on the session when a refresh fails.
pub const REFRESH_ERROR: &str = "RefreshAccessTokenError";

/// Owns the session and keeps it in sync with the backend.
///
/// Cheap to clone (internal `Arc`); clones share the same session. Token
/// updates take a short write lock that is never held across a request.
#[derive(Clone)]
pub struct RestSessionManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    client: ApiClient,
    clock: Arc<dyn Clock>,
    state: RwLock<Session>,
}

impl RestSessionManager {
    /// A manager with no session yet. Call [`login`](Self::login) next.
    pub fn new(api: ApiUrl) -> Self {
        Self::build(api, Session::unauthenticated(), None, Arc::new(SystemClock))
    }

    /// Restore a previously persisted session without signing in again.
    ///
    /// The caller is responsible for the tokens' validity; an expired access
    /// token is refreshed on first use.
    pub fn from_persisted(api: ApiUrl, session: Session) -> Self {
        Self::build(api, session, None, Arc::new(SystemClock))
    }

    /// Full constructor: optional request timeout and a custom clock.
    pub fn build(
        api: ApiUrl,
        session: Session,
        timeout: Option<Duration>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                client: ApiClient::new(build_http_client(timeout), api),
                clock,
                state: RwLock::new(session),
            }),
        }
    }

    pub fn api(&self) -> &ApiUrl {
        self.inner.client.api()
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] when the backend rejects the
    /// credentials; protocol or transport errors otherwise.
    #[instrument(skip(self, credentials), fields(api = %self.api(), email = %credentials.email()))]
    pub async fn login(&self, credentials: Credentials) -> Result<Session> {
        info!("Signing in");

        let request = LoginRequest {
            email: credentials.email(),
            password: credentials.password(),
        };

        let response: TokenResponse = match self.inner.client.procedure(LOGIN, &request).await {
            Ok(response) => response,
            Err(Error::Protocol(err)) if err.is_auth_error() => {
                warn!(%err, "Sign-in rejected");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(err) => return Err(err),
        };

        let exp = self.resolve_expiry(&response);
        let mut session = Session::authenticated(
            AccessToken::new(response.access_token),
            response.refresh_token.map(RefreshToken::new),
            exp,
        );
        session.user = response.user.map(SessionUser::from);

        debug!(exp, role = ?session.user.as_ref().map(|u| u.role), "Signed in");
        *self.write() = session.clone();
        Ok(session)
    }

    /// Sign out: tell the backend (best effort) and clear local state.
    ///
    /// Local state is cleared even when the backend call fails.
    #[instrument(skip(self), fields(api = %self.api()))]
    pub async fn logout(&self) -> Result<()> {
        let token = self.read().usable_access_token().cloned();
        *self.write() = Session::unauthenticated();

        let Some(token) = token else {
            debug!("No access token, skipping backend sign-out");
            return Ok(());
        };

        match self
            .inner
            .client
            .procedure_authed_no_response(LOGOUT, &token)
            .await
        {
            Ok(()) => {
                info!("Signed out");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Backend sign-out failed, local session cleared anyway");
                Err(err)
            }
        }
    }

    fn resolve_expiry(&self, response: &TokenResponse) -> i64 {
        if let Some(exp) = response.exp {
            return exp;
        }
        if let Some(expires_in) = response.expires_in {
            return self.inner.clock.now_epoch_seconds().saturating_add(expires_in);
        }
        // Unknown expiry: treat as already due so the first request refreshes.
        jwt::expiry(&response.access_token).unwrap_or(0)
    }

    fn mark_refresh_failed(&self) -> Session {
        let mut state = self.write();
        state.error = Some(REFRESH_ERROR.to_string());
        state.clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Session> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SessionProvider for RestSessionManager {
    fn current(&self) -> Session {
        self.read().clone()
    }

    /// Refresh the access token.
    ///
    /// Failures do not return `Err`; the returned session carries
    /// [`REFRESH_ERROR`] instead.
    #[instrument(skip(self), fields(api = %self.api()))]
    async fn refresh(&self) -> Result<Session> {
        info!("Refreshing session");

        let refresh_token = self.read().usable_refresh_token().cloned();
        let Some(refresh_token) = refresh_token else {
            warn!("No refresh token available");
            return Ok(self.mark_refresh_failed());
        };

        let request = RefreshRequest {
            refresh_token: refresh_token.as_str(),
        };
        let response: TokenResponse = match self.inner.client.procedure(REFRESH, &request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Session refresh failed");
                return Ok(self.mark_refresh_failed());
            }
        };

        let exp = self.resolve_expiry(&response);
        let session = {
            let mut state = self.write();
            state.access_token = Some(AccessToken::new(response.access_token));
            if let Some(rotated) = response.refresh_token {
                state.refresh_token = Some(RefreshToken::new(rotated));
            }
            state.exp = exp;
            state.error = None;
            state.status = AuthenticationStatus::Authenticated;
            if let Some(user) = response.user {
                state.user = Some(user.into());
            }
            state.clone()
        };

        debug!(exp, "Session refreshed successfully");
        Ok(session)
    }
}

impl std::fmt::Debug for RestSessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestSessionManager")
            .field("api", self.api())
            .field("session", &*self.read())
            .finish()
    }
}
