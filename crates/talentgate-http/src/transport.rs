//! reqwest-backed [`Transport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use tracing::{instrument, trace};

use talentgate_core::error::InvalidInputError;
use talentgate_core::{ApiUrl, Headers, Method, PreparedRequest, Response, Result, Transport};

use crate::client::{build_http_client, transport_error};

/// Sends prepared requests over HTTP.
///
/// Relative request URLs are resolved against the API base URL. No timeout
/// is applied unless one is configured.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    api: ApiUrl,
}

impl HttpTransport {
    pub fn new(api: ApiUrl) -> Self {
        Self::from_client(build_http_client(None), api)
    }

    pub fn with_timeout(api: ApiUrl, timeout: Duration) -> Self {
        Self::from_client(build_http_client(Some(timeout)), api)
    }

    /// Reuse an existing client and its connection pool.
    pub fn from_client(client: reqwest::Client, api: ApiUrl) -> Self {
        Self { client, api }
    }

    pub fn api(&self) -> &ApiUrl {
        &self.api
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: &PreparedRequest) -> Result<Response> {
        let url = self.api.resolve(&request.url)?;

        let mut builder = self.client.request(reqwest_method(request.method), &url);
        for (name, value) in request.headers.iter() {
            let (name, value) = header_pair(name, value)?;
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(transport_error)?;

        let status = response.status().as_u16();
        trace!(status, "HTTP response");

        let headers: Headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(transport_error)?.to_vec();

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|e| InvalidInputError::Header {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
    let header_value = HeaderValue::from_str(value).map_err(|e| InvalidInputError::Header {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok((header_name, header_value))
}
