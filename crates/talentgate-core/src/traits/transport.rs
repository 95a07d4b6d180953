//! HTTP transport trait.

use async_trait::async_trait;

use crate::Result;
use crate::request::{PreparedRequest, Response};

/// Performs one HTTP round trip.
///
/// Network failures are returned as errors; every HTTP status, 401
/// included, is a successful `Response`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &PreparedRequest) -> Result<Response>;
}
