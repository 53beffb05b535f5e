//! Raw response pass-through.

use crate::error::Result;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

/// The transport's result, returned to the caller unmodified.
///
/// Non-2xx statuses are ordinary responses here; inspect [`status`](Self::status)
/// or [`is_success`](Self::is_success) before trusting the body.
#[derive(Debug, Clone)]
pub struct NutritionResponse {
    status: u16,
    headers: HeaderMap,
    body: String,
}

impl NutritionResponse {
    /// Assemble a response from its parts.
    #[must_use]
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// HTTP status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Consume the response, returning the body text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.body
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}
