//! JSON client for the backend's auth endpoints.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use talentgate_core::error::{InvalidInputError, ProtocolError, TransportError};
use talentgate_core::{AccessToken, ApiUrl, Error, Result};

use crate::endpoints::ErrorResponse;

/// Build the shared reqwest client.
pub(crate) fn build_http_client(timeout: Option<Duration>) -> reqwest::Client {
    let mut builder =
        reqwest::Client::builder().user_agent(concat!("talentgate/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().expect("failed to build HTTP client")
}

/// Map a reqwest failure onto the transport error taxonomy.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let err = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(err)
}

/// HTTP client for auth endpoint calls.
#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    client: reqwest::Client,
    api: ApiUrl,
}

impl ApiClient {
    pub fn new(client: reqwest::Client, api: ApiUrl) -> Self {
        Self { client, api }
    }

    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    /// POST a JSON body and decode a JSON answer.
    #[instrument(skip(self, body), fields(api = %self.api))]
    pub async fn procedure<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.api.endpoint(path);
        debug!(%url, "Auth procedure");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        self.handle_response(response).await
    }

    /// POST with a bearer token, ignoring the response body.
    #[instrument(skip(self, token), fields(api = %self.api))]
    pub async fn procedure_authed_no_response(&self, path: &str, token: &AccessToken) -> Result<()> {
        let url = self.api.endpoint(path);
        debug!(%url, "Authenticated auth procedure (no response)");

        let response = self
            .client
            .post(&url)
            .headers(auth_headers(token)?)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::Protocol(parse_error_response(response).await))
        }
    }

    async fn handle_response<R: DeserializeOwned>(&self, response: reqwest::Response) -> Result<R> {
        let status = response.status();
        trace!(status = %status, "Auth response");

        if status.is_success() {
            response.json::<R>().await.map_err(transport_error)
        } else {
            Err(Error::Protocol(parse_error_response(response).await))
        }
    }
}

fn auth_headers(token: &AccessToken) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(&token.bearer()).map_err(|e| InvalidInputError::Header {
        name: AUTHORIZATION.as_str().to_string(),
        reason: e.to_string(),
    })?;
    headers.insert(AUTHORIZATION, value);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

async fn parse_error_response(response: reqwest::Response) -> ProtocolError {
    let status = response.status().as_u16();

    match response.json::<ErrorResponse>().await {
        Ok(body) => ProtocolError::new(status, body.error, body.message.or(body.detail)),
        Err(_) => ProtocolError::new(status, None, None),
    }
}
