//! Nutritionix - typed async client for the Nutritionix v2 nutrition-data API.
//!
//! Each method maps one call to one HTTP request and hands back the raw
//! response. There is no caching, retry or response validation.
//!
//! # Features
//!
//! - **Instant search**: `search/instant`, plus autocomplete on the same endpoint
//! - **Natural language**: `natural/nutrients` for queries like "1 cup butter"
//! - **Lookups**: items and brands by id, brand search
//! - **Pluggable transport**: [`HttpTransport`] trait, `reqwest` by default
//! - **Per-client debug logging**: [`ResponseLog`] instead of global logger setup
//!
//! # Example
//!
//! ```rust,no_run
//! use nutritionix::{NaturalRequest, NutritionClient, SearchRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = NutritionClient::new("your-app-id", "your-api-key")?.with_debug(true);
//!
//! let response = client
//!     .search(&SearchRequest::new("big mac").with_pagination(5, 0))
//!     .await?;
//! println!("{}: {}", response.status(), response.text());
//!
//! let nutrients: serde_json::Value = client
//!     .natural_nutrients(&NaturalRequest::new("1 cup butter"))
//!     .await?
//!     .json()?;
//! println!("{nutrients}");
//! # Ok(())
//! # }
//! ```
//!
//! # Request flow
//!
//! ```text
//! domain method → execute (pagination check, auth headers, verb) → HttpTransport
//!                                                                       ↓
//! caller ← NutritionResponse (status, headers, body) ←──────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod request;
pub mod response;
pub mod transport;

// Re-export commonly used types
pub use client::{NutritionClient, API_VERSION, BASE_URL};
pub use config::ClientConfig;
pub use credentials::Credentials;
pub use error::{ConfigError, ConfigResult, NutritionixError, Result};
pub use logging::{ResponseLog, TracingResponseLog};
pub use request::{HttpMethod, NaturalRequest, QueryParams, RequestSpec, SearchRequest};
pub use response::NutritionResponse;
pub use transport::{HttpTransport, ReqwestTransport};

pub use reqwest::header::HeaderMap;
pub use url::Url;
