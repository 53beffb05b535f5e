//! The Nutritionix API client.

use crate::config::ClientConfig;
use crate::credentials::{Credentials, APP_ID_HEADER, APP_KEY_HEADER};
use crate::error::{NutritionixError, Result};
use crate::logging::{ResponseLog, TracingResponseLog};
use crate::request::{HttpMethod, NaturalRequest, QueryParams, RequestSpec, SearchRequest};
use crate::response::NutritionResponse;
use crate::transport::{HttpTransport, ReqwestTransport, DEFAULT_TIMEOUT_SECS};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// API version targeted by this client.
pub const API_VERSION: &str = "v2";

/// Default API root.
pub const BASE_URL: &str = "https://trackapi.nutritionix.com/v2/";

const SEARCH_INSTANT_PATH: &str = "search/instant";
const NATURAL_NUTRIENTS_PATH: &str = "natural/nutrients";
const ITEM_PATH: &str = "item";
const BRAND_PATH: &str = "brand";
const BRAND_SEARCH_PATH: &str = "search/brands/";

/// Client for the Nutritionix v2 API.
///
/// Every method maps to exactly one HTTP request and returns the raw
/// [`NutritionResponse`]. There is no retry, caching or status validation.
#[derive(Clone)]
pub struct NutritionClient {
    credentials: Credentials,
    auth_headers: HeaderMap,
    base_url: Url,
    transport: Arc<dyn HttpTransport>,
    response_log: Option<Arc<dyn ResponseLog>>,
}

impl fmt::Debug for NutritionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NutritionClient")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url.as_str())
            .field("debug", &self.is_debug())
            .finish_non_exhaustive()
    }
}

impl NutritionClient {
    /// Create a client with the default base URL, timeout and transport.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created or the credentials
    /// are not valid header values.
    pub fn new(application_id: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let transport = ReqwestTransport::new(Some(DEFAULT_TIMEOUT_SECS), None)?;
        Self::from_parts(
            Credentials::new(application_id, api_key),
            Arc::new(transport),
        )
    }

    /// Create a client from a validated [`ClientConfig`].
    ///
    /// # Errors
    /// Returns error if the config is invalid or the HTTP client cannot be created.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport =
            ReqwestTransport::new(Some(config.timeout_secs), Some(config.user_agent.as_str()))?;

        Ok(Self::from_parts(
            Credentials::new(config.application_id.clone(), config.api_key.clone()),
            Arc::new(transport),
        )?
        .with_base_url(&config.base_url)?
        .with_debug(config.debug))
    }

    /// Create a client over an arbitrary transport.
    ///
    /// # Errors
    /// Returns error if the credentials are not valid header values.
    pub fn from_parts(credentials: Credentials, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        let auth_headers = build_auth_headers(&credentials)?;
        let base_url = Url::parse(BASE_URL)?;

        Ok(Self {
            credentials,
            auth_headers,
            base_url,
            transport,
            response_log: None,
        })
    }

    /// Replace the transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = transport;
        self
    }

    /// Point the client at a different API root (proxy, mock server).
    ///
    /// A trailing `/` is added if missing so endpoints resolve beneath it.
    ///
    /// # Errors
    /// Returns error if the URL does not parse, is not `http`/`https`, or
    /// carries a query or fragment that endpoint resolution would drop.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let url = Url::parse(&base_url)?;
        if url.cannot_be_a_base() {
            return Err(NutritionixError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        if !matches!(url.scheme(), "http" | "https") {
            return Err(NutritionixError::InvalidBaseUrl {
                url: url.to_string(),
                reason: "scheme must be http or https",
            });
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(NutritionixError::InvalidBaseUrl {
                url: url.to_string(),
                reason: "query and fragment are not allowed",
            });
        }

        self.base_url = url;
        Ok(self)
    }

    /// Toggle response body logging through `tracing`.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.response_log = if debug {
            Some(Arc::new(TracingResponseLog))
        } else {
            None
        };
        self
    }

    /// Enable debug mode with a custom response log.
    #[must_use]
    pub fn with_response_log(mut self, log: Arc<dyn ResponseLog>) -> Self {
        self.response_log = Some(log);
        self
    }

    /// API version this client targets.
    #[must_use]
    pub fn api_version(&self) -> &'static str {
        API_VERSION
    }

    /// Configured application id.
    #[must_use]
    pub fn application_id(&self) -> &str {
        self.credentials.application_id()
    }

    /// Configured API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// API root endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether responses are being logged.
    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.response_log.is_some()
    }

    /// Validate, authenticate and dispatch a single request.
    ///
    /// `method` is matched case-insensitively against `GET` and `POST`. Any
    /// other method returns `Ok(None)` without sending anything. For `GET`
    /// the body is ignored. `X-APP-ID` and `X-APP-KEY` always carry the
    /// client's credentials, whatever `headers` says.
    ///
    /// # Errors
    /// Returns [`NutritionixError::MissingPaginationParameter`] when exactly
    /// one of `limit`/`offset` is in `params`, or the transport's error.
    pub async fn execute(
        &self,
        url: Url,
        method: &str,
        params: QueryParams,
        body: Option<Vec<u8>>,
        headers: HeaderMap,
    ) -> Result<Option<NutritionResponse>> {
        params.check_pagination()?;

        let Some(parsed) = HttpMethod::parse(method) else {
            tracing::debug!(method, %url, "Unsupported HTTP method, request not sent");
            return Ok(None);
        };

        self.send(parsed, url, params, body, headers).await.map(Some)
    }

    /// Instant search for a food term, via `search/instant`.
    pub async fn search(&self, request: &SearchRequest) -> Result<NutritionResponse> {
        let endpoint = self.endpoint(SEARCH_INSTANT_PATH)?;
        self.dispatch(
            HttpMethod::Get,
            endpoint,
            request.to_query_params(),
            None,
            HeaderMap::new(),
        )
        .await
    }

    /// Autocomplete for search boxes. Uses the same endpoint as [`search`](Self::search).
    ///
    /// Only the query is sent: extra parameters on `request` are dropped.
    pub async fn autocomplete_food(&self, request: &SearchRequest) -> Result<NutritionResponse> {
        if !request.params().is_empty() {
            tracing::debug!(
                dropped = request.params().len(),
                "autocomplete_food sends only the query, extra parameters dropped"
            );
        }
        self.search(&SearchRequest::new(request.query())).await
    }

    /// Natural-language nutrient lookup, e.g. "1 cup butter".
    ///
    /// The query travels as a JSON body; extra parameters go on the URL.
    pub async fn natural_nutrients(&self, request: &NaturalRequest) -> Result<NutritionResponse> {
        let endpoint = self.endpoint(NATURAL_NUTRIENTS_PATH)?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        self.dispatch(
            HttpMethod::Post,
            endpoint,
            request.params().clone(),
            Some(request.body()?),
            headers,
        )
        .await
    }

    /// Look up a specific item by id.
    ///
    /// # Errors
    /// Returns [`NutritionixError::MissingField`] if `id` is blank.
    pub async fn item(&self, id: &str) -> Result<NutritionResponse> {
        let endpoint = self.resource_endpoint(ITEM_PATH, id)?;
        self.get(endpoint).await
    }

    /// Look up a specific brand by id.
    ///
    /// # Errors
    /// Returns [`NutritionixError::MissingField`] if `id` is blank.
    pub async fn brand(&self, id: &str) -> Result<NutritionResponse> {
        let endpoint = self.resource_endpoint(BRAND_PATH, id)?;
        self.get(endpoint).await
    }

    /// Search brands, forwarding `params` as the query string.
    pub async fn brand_search(&self, params: &QueryParams) -> Result<NutritionResponse> {
        let endpoint = self.endpoint(BRAND_SEARCH_PATH)?;
        self.dispatch(
            HttpMethod::Get,
            endpoint,
            params.clone(),
            None,
            HeaderMap::new(),
        )
        .await
    }

    async fn get(&self, endpoint: Url) -> Result<NutritionResponse> {
        self.dispatch(
            HttpMethod::Get,
            endpoint,
            QueryParams::new(),
            None,
            HeaderMap::new(),
        )
        .await
    }

    async fn dispatch(
        &self,
        method: HttpMethod,
        url: Url,
        params: QueryParams,
        body: Option<Vec<u8>>,
        headers: HeaderMap,
    ) -> Result<NutritionResponse> {
        params.check_pagination()?;
        self.send(method, url, params, body, headers).await
    }

    async fn send(
        &self,
        method: HttpMethod,
        url: Url,
        params: QueryParams,
        body: Option<Vec<u8>>,
        mut headers: HeaderMap,
    ) -> Result<NutritionResponse> {
        for (name, value) in &self.auth_headers {
            headers.insert(name.clone(), value.clone());
        }

        let body = match method {
            HttpMethod::Get => None,
            HttpMethod::Post => body,
        };

        tracing::debug!(%method, %url, "Sending Nutritionix request");
        let request = RequestSpec {
            url: url.clone(),
            method,
            query: params,
            body,
            headers,
        };
        let response = self.transport.send(request).await?;

        if let Some(log) = &self.response_log {
            log.log_response(method, &url, &response);
        }

        Ok(response)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// `<base>/<resource>/<id>`, with `id` encoded as a single path segment.
    fn resource_endpoint(&self, resource: &str, id: &str) -> Result<Url> {
        if id.trim().is_empty() {
            return Err(NutritionixError::MissingField { field: "id" });
        }

        let mut url = self.endpoint(resource)?;
        url.path_segments_mut()
            .map_err(|()| {
                NutritionixError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase)
            })?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }
}

fn build_auth_headers(credentials: &Credentials) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(APP_ID_HEADER),
        header_value(APP_ID_HEADER, credentials.application_id())?,
    );

    let mut key = header_value(APP_KEY_HEADER, credentials.api_key())?;
    key.set_sensitive(true);
    headers.insert(HeaderName::from_static(APP_KEY_HEADER), key);

    Ok(headers)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| NutritionixError::InvalidHeader {
        name: name.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::capture::CapturedLogs;
    use crate::logging::RESPONSE_TARGET;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every request and answers 200 with a fixed body.
    #[derive(Default)]
    struct RecordingTransport {
        requests: Mutex<Vec<RequestSpec>>,
    }

    impl RecordingTransport {
        fn requests(&self) -> Vec<RequestSpec> {
            self.requests.lock().expect("lock requests").clone()
        }

        fn last(&self) -> RequestSpec {
            self.requests().pop().expect("a request was sent")
        }
    }

    #[async_trait]
    impl HttpTransport for RecordingTransport {
        async fn send(&self, request: RequestSpec) -> Result<NutritionResponse> {
            self.requests
                .lock()
                .expect("lock requests")
                .push(request);
            Ok(NutritionResponse::new(200, HeaderMap::new(), r#"{"ok":true}"#))
        }
    }

    #[derive(Default)]
    struct CapturingLog {
        lines: Mutex<Vec<String>>,
    }

    impl ResponseLog for CapturingLog {
        fn log_response(&self, method: HttpMethod, url: &Url, response: &NutritionResponse) {
            self.lines
                .lock()
                .expect("lock lines")
                .push(format!("{method} {url} {}", response.text()));
        }
    }

    fn test_client() -> (NutritionClient, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::default());
        let client = NutritionClient::from_parts(
            Credentials::new("app-123", "key-456"),
            transport.clone(),
        )
        .expect("create client");
        (client, transport)
    }

    fn pairs(params: &QueryParams) -> Vec<(&str, &str)> {
        params.iter().collect()
    }

    fn search_url() -> Url {
        Url::parse("https://trackapi.nutritionix.com/v2/search/instant").expect("valid url")
    }

    #[test]
    fn test_client_creation() {
        let client = NutritionClient::new("app-123", "key-456").expect("create client");
        assert_eq!(client.api_version(), "v2");
        assert_eq!(client.application_id(), "app-123");
        assert_eq!(client.api_key(), "key-456");
        assert_eq!(client.base_url().as_str(), BASE_URL);
        assert!(!client.is_debug());
        assert!(client.with_debug(true).is_debug());
    }

    #[test]
    fn test_debug_output_hides_key() {
        let (client, _) = test_client();
        let debug = format!("{client:?}");
        assert!(debug.contains("app-123"));
        assert!(!debug.contains("key-456"));
    }

    #[test]
    fn test_invalid_credentials_rejected() {
        let transport = Arc::new(RecordingTransport::default());
        let result = NutritionClient::from_parts(Credentials::new("app\n123", "key"), transport);
        assert!(matches!(
            result,
            Err(NutritionixError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_from_config() {
        let mut config = ClientConfig::new("app-123", "key-456");
        config.base_url = "http://localhost:8080/v2".to_string();
        config.debug = true;

        let client = NutritionClient::from_config(&config).expect("create client");
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/v2/");
        assert!(client.is_debug());

        let missing_key = ClientConfig::new("app-123", "");
        assert!(matches!(
            NutritionClient::from_config(&missing_key),
            Err(NutritionixError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_search_builds_get_request() {
        let (client, transport) = test_client();

        client
            .search(&SearchRequest::new("big mac"))
            .await
            .expect("search");

        let request = transport.last();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.url.as_str(),
            "https://trackapi.nutritionix.com/v2/search/instant"
        );
        assert_eq!(pairs(&request.query), vec![("query", "big mac")]);
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_search_with_pagination() {
        let (client, transport) = test_client();

        client
            .search(&SearchRequest::new("big mac").with_pagination(5, 0))
            .await
            .expect("search");

        let request = transport.last();
        assert_eq!(
            pairs(&request.query),
            vec![("query", "big mac"), ("limit", "5"), ("offset", "0")]
        );
    }

    #[tokio::test]
    async fn test_search_with_partial_pagination_fails() {
        let (client, transport) = test_client();

        let result = client
            .search(&SearchRequest::new("big mac").with_param("limit", 5))
            .await;

        assert!(matches!(
            result,
            Err(NutritionixError::MissingPaginationParameter {
                missing: "offset",
                ..
            })
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_autocomplete_drops_extra_params() {
        let (client, transport) = test_client();

        client
            .autocomplete_food(&SearchRequest::new("grilled ch").with_param("branded", false))
            .await
            .expect("autocomplete");

        let request = transport.last();
        assert_eq!(request.url.path(), "/v2/search/instant");
        assert_eq!(pairs(&request.query), vec![("query", "grilled ch")]);
    }

    #[tokio::test]
    async fn test_natural_nutrients_posts_json() {
        let (client, transport) = test_client();

        client
            .natural_nutrients(&NaturalRequest::new("1 cup butter").with_param("locale", "en_US"))
            .await
            .expect("natural nutrients");

        let request = transport.last();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(
            request.url.as_str(),
            "https://trackapi.nutritionix.com/v2/natural/nutrients"
        );
        assert_eq!(
            request.headers.get(CONTENT_TYPE).map(HeaderValue::as_bytes),
            Some(&b"application/json"[..])
        );
        assert_eq!(pairs(&request.query), vec![("locale", "en_US")]);

        let body: serde_json::Value =
            serde_json::from_slice(&request.body.expect("body sent")).expect("json body");
        assert_eq!(body, serde_json::json!({"query": "1 cup butter"}));
    }

    #[tokio::test]
    async fn test_item_and_brand_lookup() {
        let (client, transport) = test_client();

        client.item("51c8e0d2").await.expect("item");
        let request = transport.last();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.url.as_str(),
            "https://trackapi.nutritionix.com/v2/item/51c8e0d2"
        );
        assert!(request.query.is_empty());

        client.brand("513fbc1283aa2dc80c00001f").await.expect("brand");
        let request = transport.last();
        assert_eq!(
            request.url.as_str(),
            "https://trackapi.nutritionix.com/v2/brand/513fbc1283aa2dc80c00001f"
        );
        assert!(request.query.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_id_is_single_segment() {
        let (client, transport) = test_client();

        client.item("a/b c").await.expect("item");
        assert_eq!(transport.last().url.path(), "/v2/item/a%2Fb%20c");
    }

    #[tokio::test]
    async fn test_lookup_id_sent_as_given() {
        let (client, transport) = test_client();

        client.item(" abc ").await.expect("item");
        assert_eq!(transport.last().url.path(), "/v2/item/%20abc%20");
    }

    #[tokio::test]
    async fn test_blank_id_rejected() {
        let (client, transport) = test_client();

        assert!(matches!(
            client.item("").await,
            Err(NutritionixError::MissingField { field: "id" })
        ));
        assert!(matches!(
            client.brand("   ").await,
            Err(NutritionixError::MissingField { field: "id" })
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_brand_search_forwards_params() {
        let (client, transport) = test_client();

        client
            .brand_search(&QueryParams::new().with("name", "nike"))
            .await
            .expect("brand search");

        let request = transport.last();
        assert_eq!(
            request.url.as_str(),
            "https://trackapi.nutritionix.com/v2/search/brands/"
        );
        assert_eq!(pairs(&request.query), vec![("name", "nike")]);
    }

    #[tokio::test]
    async fn test_execute_unsupported_method_is_noop() {
        let (client, transport) = test_client();

        let result = client
            .execute(
                search_url(),
                "PUT",
                QueryParams::new(),
                None,
                HeaderMap::new(),
            )
            .await
            .expect("no error for unsupported method");

        assert!(result.is_none());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_execute_checks_pagination_before_method() {
        let (client, _) = test_client();

        let result = client
            .execute(
                search_url(),
                "PUT",
                QueryParams::new().with("offset", 10),
                None,
                HeaderMap::new(),
            )
            .await;

        assert!(matches!(
            result,
            Err(NutritionixError::MissingPaginationParameter {
                missing: "limit",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_execute_overrides_auth_headers() {
        let (client, transport) = test_client();

        let mut headers = HeaderMap::new();
        headers.insert("X-APP-ID", HeaderValue::from_static("spoofed"));
        headers.insert("x-app-key", HeaderValue::from_static("spoofed"));
        headers.insert("x-remote-user-id", HeaderValue::from_static("0"));

        let response = client
            .execute(search_url(), "get", QueryParams::new(), None, headers)
            .await
            .expect("execute");
        assert!(response.is_some());

        let request = transport.last();
        assert_eq!(request.headers["x-app-id"], "app-123");
        assert_eq!(request.headers["X-APP-KEY"], "key-456");
        assert_eq!(request.headers.get_all("x-app-id").iter().count(), 1);
        assert_eq!(request.headers["x-remote-user-id"], "0");
    }

    #[tokio::test]
    async fn test_execute_get_ignores_body() {
        let (client, transport) = test_client();

        client
            .execute(
                search_url(),
                "GET",
                QueryParams::new().with_pagination(10, 20),
                Some(b"ignored".to_vec()),
                HeaderMap::new(),
            )
            .await
            .expect("execute");

        let request = transport.last();
        assert!(request.body.is_none());
        assert_eq!(pairs(&request.query), vec![("limit", "10"), ("offset", "20")]);
    }

    #[tokio::test]
    async fn test_execute_post_sends_body() {
        let (client, transport) = test_client();

        client
            .execute(
                search_url(),
                "Post",
                QueryParams::new(),
                Some(b"payload".to_vec()),
                HeaderMap::new(),
            )
            .await
            .expect("execute");

        let request = transport.last();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.body.as_deref(), Some(&b"payload"[..]));
    }

    #[tokio::test]
    async fn test_response_log_only_when_debug() {
        let (client, _) = test_client();
        let log = Arc::new(CapturingLog::default());

        client.item("51c8e0d2").await.expect("item");
        assert!(log.lines.lock().expect("lock lines").is_empty());

        let client = client.with_response_log(log.clone());
        client.item("51c8e0d2").await.expect("item");

        let lines = log.lines.lock().expect("lock lines").clone();
        assert_eq!(
            lines,
            vec![r#"GET https://trackapi.nutritionix.com/v2/item/51c8e0d2 {"ok":true}"#]
        );
    }

    #[tokio::test]
    async fn test_custom_base_url() {
        let (client, transport) = test_client();
        let client = client
            .with_base_url("http://localhost:9000/nutritionix/v2")
            .expect("base url");

        client
            .brand_search(&QueryParams::new())
            .await
            .expect("brand search");
        assert_eq!(
            transport.last().url.as_str(),
            "http://localhost:9000/nutritionix/v2/search/brands/"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let (client, _) = test_client();
        assert!(client.clone().with_base_url("not a url").is_err());
        assert!(client
            .clone()
            .with_base_url("mailto:nobody@example.com")
            .is_err());

        assert!(matches!(
            client.clone().with_base_url("file:///tmp/v2"),
            Err(NutritionixError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            client.clone().with_base_url("http://localhost/v2/?x=1"),
            Err(NutritionixError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            client.with_base_url("https://localhost/v2/#top"),
            Err(NutritionixError::InvalidBaseUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_with_debug_logs_through_tracing() {
        let (client, _) = test_client();
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());

        client.item("51c8e0d2").await.expect("item");
        assert!(!logs.contents().contains(RESPONSE_TARGET));

        let client = client.with_debug(true);
        client.item("51c8e0d2").await.expect("item");

        let output = logs.contents();
        assert!(output.contains(RESPONSE_TARGET));
        assert!(output.contains(r#"Response Content: {"ok":true}"#));
    }
}
