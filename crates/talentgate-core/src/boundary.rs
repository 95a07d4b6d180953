//! Forced sign-out at the edge of the request layer.

use std::sync::Arc;

use tracing::warn;

use crate::Result;
use crate::executor::AuthenticatedRequestExecutor;
use crate::request::{RequestDescriptor, Response};
use crate::traits::{SessionProvider, SignOutHandler, Transport};

/// Wraps an executor and turns unrecoverable auth failures into a sign-out
/// followed by a redirect to sign-in. The error is still returned to the
/// caller.
pub struct SignOutBoundary<P: ?Sized, T: ?Sized, H: ?Sized> {
    executor: AuthenticatedRequestExecutor<P, T>,
    handler: Arc<H>,
}

impl<P, T, H> SignOutBoundary<P, T, H>
where
    P: SessionProvider + ?Sized,
    T: Transport + ?Sized,
    H: SignOutHandler + ?Sized,
{
    pub fn new(executor: AuthenticatedRequestExecutor<P, T>, handler: Arc<H>) -> Self {
        Self { executor, handler }
    }

    pub fn executor(&self) -> &AuthenticatedRequestExecutor<P, T> {
        &self.executor
    }

    pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<Response> {
        let result = self.executor.execute(descriptor).await;
        self.guard(result).await
    }

    pub async fn execute_with_retries(
        &self,
        descriptor: &RequestDescriptor,
        max_retries: u32,
    ) -> Result<Response> {
        let result = self
            .executor
            .execute_with_retries(descriptor, max_retries)
            .await;
        self.guard(result).await
    }

    async fn guard(&self, result: Result<Response>) -> Result<Response> {
        match result {
            Err(err) if err.requires_sign_in() => {
                warn!(error = %err, "Forcing sign-out");
                self.handler.terminate_session().await;
                self.handler.redirect_to_sign_in();
                Err(err)
            }
            other => other,
        }
    }
}
