//! Application credentials attached to every request.

use std::fmt;

/// Header carrying the application identifier (`X-APP-ID`).
///
/// Lower-case because header names are case-insensitive and `http` stores
/// them normalized.
pub const APP_ID_HEADER: &str = "x-app-id";

/// Header carrying the API key (`X-APP-KEY`).
pub const APP_KEY_HEADER: &str = "x-app-key";

/// Application id and API key pair.
///
/// Immutable once the client is built. The key is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    application_id: String,
    api_key: String,
}

impl Credentials {
    /// Create a credential pair.
    #[must_use]
    pub fn new(application_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            api_key: api_key.into(),
        }
    }

    /// The application identifier sent as `X-APP-ID`.
    #[must_use]
    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    /// The API key sent as `X-APP-KEY`.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("application_id", &self.application_id)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
