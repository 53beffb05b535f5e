//! HTTP transport seam.
//!
//! The client never talks to the network directly; it hands a [`RequestSpec`]
//! to an [`HttpTransport`]. [`ReqwestTransport`] is the default.

use crate::error::Result;
use crate::request::RequestSpec;
use crate::response::NutritionResponse;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Sends one assembled request and returns the raw response.
///
/// Implementations must not validate status codes; transport failures are
/// surfaced as errors, everything else as a response.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request.
    ///
    /// # Errors
    /// Returns error on connection failure, timeout or DNS failure.
    async fn send(&self, request: RequestSpec) -> Result<NutritionResponse>;
}

/// Build an HTTP client with the given timeout and optional user agent.
///
/// # Arguments
/// * `timeout_secs` - Timeout in seconds (defaults to 30 if not specified)
/// * `user_agent` - `User-Agent` header value, reqwest's default if `None`
///
/// # Errors
/// Returns error if the HTTP client cannot be created.
pub fn build_http_client(timeout_secs: Option<u64>, user_agent: Option<&str>) -> Result<Client> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)));
    if let Some(user_agent) = user_agent {
        builder = builder.user_agent(user_agent.to_string());
    }
    Ok(builder.build()?)
}

/// [`HttpTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with its own HTTP client.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(timeout_secs: Option<u64>, user_agent: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout_secs, user_agent)?,
        })
    }

    /// Wrap an existing `reqwest` client, e.g. one shared with other services.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: RequestSpec) -> Result<NutritionResponse> {
        let RequestSpec {
            url,
            method,
            query,
            body,
            headers,
        } = request;

        let mut builder = self
            .client
            .request(method.into(), url)
            .headers(headers)
            .query(query.as_pairs());
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(NutritionResponse::new(status, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(Some(10), Some("nutritionix-test/1.0"));
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_http_client_default() {
        let client = build_http_client(None, None);
        assert!(client.is_ok());
    }

    #[test]
    fn test_transport_creation() {
        assert!(ReqwestTransport::new(Some(5), None).is_ok());
        let _ = ReqwestTransport::from_client(Client::new());
    }
}
