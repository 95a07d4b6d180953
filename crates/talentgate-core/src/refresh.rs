//! Single-flight session refresh.
//!
//! Concurrent requests that see the same stale access token share one
//! refresh: the first caller to take the gate refreshes, the rest find the
//! token already replaced and reuse it.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::Result;
use crate::session::Session;
use crate::tokens::AccessToken;
use crate::traits::SessionProvider;

/// Serializes refreshes against one [`SessionProvider`].
pub struct RefreshCoordinator<P: ?Sized> {
    provider: Arc<P>,
    gate: Mutex<()>,
}

impl<P: SessionProvider + ?Sized> RefreshCoordinator<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            gate: Mutex::new(()),
        }
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// Refresh the session unless another task already replaced `stale`.
    ///
    /// Pass `None` to force a refresh.
    #[instrument(skip_all)]
    pub async fn refresh(&self, stale: Option<&AccessToken>) -> Result<Session> {
        let _guard = self.gate.lock().await;

        if let Some(stale) = stale {
            let current = self.provider.current();
            let replaced = current
                .usable_access_token()
                .is_some_and(|token| token != stale);
            if replaced && current.has_usable_access_token() {
                debug!("Access token already refreshed by a concurrent request");
                return Ok(current);
            }
        }

        self.provider.refresh().await
    }
}

impl<P: ?Sized> std::fmt::Debug for RefreshCoordinator<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::tokens::RefreshToken;

    struct SlowProvider {
        session: StdMutex<Session>,
        refreshes: AtomicUsize,
    }

    #[async_trait]
    impl SessionProvider for SlowProvider {
        fn current(&self) -> Session {
            self.session.lock().unwrap().clone()
        }

        async fn refresh(&self) -> Result<Session> {
            let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(Duration::from_millis(20)).await;
            let mut session = self.session.lock().unwrap();
            session.access_token = Some(AccessToken::new(format!("access-{n}")));
            Ok(session.clone())
        }
    }

    fn provider() -> Arc<SlowProvider> {
        Arc::new(SlowProvider {
            session: StdMutex::new(Session::authenticated(
                AccessToken::new("access-0"),
                Some(RefreshToken::new("refresh")),
                0,
            )),
            refreshes: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn concurrent_refreshes_of_same_token_collapse() {
        let provider = provider();
        let coordinator = Arc::new(RefreshCoordinator::new(provider.clone()));
        let stale = AccessToken::new("access-0");

        let (a, b, c) = tokio::join!(
            coordinator.refresh(Some(&stale)),
            coordinator.refresh(Some(&stale)),
            coordinator.refresh(Some(&stale)),
        );

        assert_eq!(provider.refreshes.load(Ordering::SeqCst), 1);
        for session in [a.unwrap(), b.unwrap(), c.unwrap()] {
            assert_eq!(session.access_token, Some(AccessToken::new("access-1")));
        }
    }

    #[tokio::test]
    async fn forced_refresh_always_calls_provider() {
        let provider = provider();
        let coordinator = RefreshCoordinator::new(provider.clone());

        coordinator.refresh(None).await.unwrap();
        coordinator.refresh(None).await.unwrap();

        assert_eq!(provider.refreshes.load(Ordering::SeqCst), 2);
    }
}
