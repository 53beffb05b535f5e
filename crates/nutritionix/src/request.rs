//! Request construction types: HTTP verbs, query parameters and typed
//! per-endpoint request builders.

use crate::error::{NutritionixError, Result};
use reqwest::header::HeaderMap;
use serde::Serialize;
use std::fmt;
use url::Url;

/// Query parameter key for the page size.
pub const LIMIT_PARAM: &str = "limit";

/// Query parameter key for the page offset.
pub const OFFSET_PARAM: &str = "offset";

/// HTTP verbs the Nutritionix API is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// Query parameters only
    Get,
    /// Query parameters plus a body payload
    Post,
}

impl HttpMethod {
    /// Parse a method name case-insensitively.
    ///
    /// Returns `None` for anything other than `GET` or `POST`.
    #[must_use]
    pub fn parse(method: &str) -> Option<Self> {
        if method.eq_ignore_ascii_case("get") {
            Some(Self::Get)
        } else if method.eq_ignore_ascii_case("post") {
            Some(Self::Post)
        } else {
            None
        }
    }

    /// Canonical upper-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
        }
    }
}

/// Ordered query parameter map.
///
/// Keys are unique; inserting an existing key replaces its value in place so
/// the original position is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Set both `limit` and `offset`.
    #[must_use]
    pub fn with_pagination(self, limit: u32, offset: u32) -> Self {
        self.with(LIMIT_PARAM, limit).with(OFFSET_PARAM, offset)
    }

    /// Look up a parameter value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether a parameter is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy every parameter of `other` into `self`, `other` winning on conflicts.
    pub fn merge(&mut self, other: &QueryParams) {
        for (key, value) in other.iter() {
            self.insert(key, value);
        }
    }

    /// The raw pairs, in the shape `reqwest::RequestBuilder::query` expects.
    #[must_use]
    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Pagination needs both `limit` and `offset`, or neither.
    pub fn check_pagination(&self) -> Result<()> {
        match (
            self.contains_key(LIMIT_PARAM),
            self.contains_key(OFFSET_PARAM),
        ) {
            (true, false) => Err(NutritionixError::MissingPaginationParameter {
                missing: OFFSET_PARAM,
                present: LIMIT_PARAM,
            }),
            (false, true) => Err(NutritionixError::MissingPaginationParameter {
                missing: LIMIT_PARAM,
                present: OFFSET_PARAM,
            }),
            _ => Ok(()),
        }
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

impl<K: Into<String>, V: ToString> Extend<(K, V)> for QueryParams {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// A fully assembled request, handed to the transport.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// Absolute endpoint URL
    pub url: Url,
    /// HTTP verb
    pub method: HttpMethod,
    /// Query string parameters
    pub query: QueryParams,
    /// Body payload; always `None` for GET
    pub body: Option<Vec<u8>>,
    /// Outgoing headers, credentials included
    pub headers: HeaderMap,
}

/// Parameters for `search/instant` (and autocomplete).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    params: QueryParams,
}

impl SearchRequest {
    /// Search for a food term like "mcdonalds big mac" or "celery".
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: QueryParams::new(),
        }
    }

    /// Add an extra pass-through query parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Add `limit` and `offset`.
    #[must_use]
    pub fn with_pagination(mut self, limit: u32, offset: u32) -> Self {
        self.params = self.params.with_pagination(limit, offset);
        self
    }

    /// The search term.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Extra parameters, without `query`.
    #[must_use]
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// `{query, ...extra}`; extras override `query` if they repeat it.
    #[must_use]
    pub fn to_query_params(&self) -> QueryParams {
        let mut params = QueryParams::new().with("query", &self.query);
        params.merge(&self.params);
        params
    }
}

/// Parameters for `natural/nutrients`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaturalRequest {
    query: String,
    params: QueryParams,
}

impl NaturalRequest {
    /// A free-text query such as "1 cup butter" or "100cal yogurt".
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: QueryParams::new(),
        }
    }

    /// Add a query-string parameter. These go on the URL, not in the body.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key, value);
        self
    }

    /// The natural-language query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// URL query parameters.
    #[must_use]
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// JSON body `{"query": ...}`.
    pub fn body(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&NaturalBody {
            query: &self.query,
        })?)
    }
}

#[derive(Serialize)]
struct NaturalBody<'a> {
    query: &'a str,
}
