//! REST API client helpers.
//!
//! A [`RestApiClient`] pairs an [`HttpClient`] with a base URL, default
//! headers and credentials, so callers only name paths and query parameters.
//!
//! # Example
//!
//! ```ignore
//! use pagestream_net::http::RestApiClient;
//!
//! let client = RestApiClient::builder("https://api.github.com")
//!     .accept("application/vnd.github.v3+json")
//!     .token_auth("ghp_...")
//!     .build()?;
//!
//! let issues: Vec<Issue> = client
//!     .get("/repos/facebook/react/issues")
//!     .query("per_page", "100")
//!     .json_response()
//!     .await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use super::client::{Authentication, HttpClient, HttpClientBuilder};
use super::request::{HttpRequest, send_request};
use super::response::HttpResponse;
use crate::error::Result;

/// Rate limit information parsed from response headers.
///
/// Standard headers supported:
/// - `X-RateLimit-Limit` or `RateLimit-Limit`: Maximum requests allowed
/// - `X-RateLimit-Remaining` or `RateLimit-Remaining`: Requests remaining in window
/// - `X-RateLimit-Reset` or `RateLimit-Reset`: Unix timestamp when limit resets
/// - `Retry-After`: Seconds to wait before retrying
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Maximum number of requests allowed in the current window.
    pub limit: Option<u64>,
    /// Number of requests remaining in the current window.
    pub remaining: Option<u64>,
    /// Unix timestamp when the rate limit window resets.
    pub reset_timestamp: Option<u64>,
    /// Duration to wait before retrying (from Retry-After header).
    pub retry_after: Option<Duration>,
}

impl RateLimitInfo {
    /// Parse rate limit information from response headers.
    pub fn from_response(response: &HttpResponse) -> Self {
        Self::from_headers(response.headers())
    }

    /// Parse rate limit information from a header map.
    pub fn from_headers(headers: &http::HeaderMap) -> Self {
        let limit = Self::parse_header_u64(headers, "X-RateLimit-Limit")
            .or_else(|| Self::parse_header_u64(headers, "RateLimit-Limit"));
        let remaining = Self::parse_header_u64(headers, "X-RateLimit-Remaining")
            .or_else(|| Self::parse_header_u64(headers, "RateLimit-Remaining"));
        let reset_timestamp = Self::parse_header_u64(headers, "X-RateLimit-Reset")
            .or_else(|| Self::parse_header_u64(headers, "RateLimit-Reset"));
        // Only the delta-seconds form of Retry-After is understood.
        let retry_after = Self::parse_header_u64(headers, "Retry-After").map(Duration::from_secs);

        Self {
            limit,
            remaining,
            reset_timestamp,
            retry_after,
        }
    }

    /// Check if rate limited (remaining is 0 or a Retry-After was sent).
    pub fn is_rate_limited(&self) -> bool {
        self.remaining == Some(0) || self.retry_after.is_some()
    }

    /// Get the duration to wait before the next request is allowed.
    ///
    /// Returns `None` if no wait is indicated or the reset time has passed.
    pub fn wait_duration(&self) -> Option<Duration> {
        if let Some(retry_after) = self.retry_after {
            return Some(retry_after);
        }

        let reset = self.reset_timestamp?;
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        (reset > now).then(|| Duration::from_secs(reset - now))
    }

    fn parse_header_u64(headers: &http::HeaderMap, name: &str) -> Option<u64> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok())
    }
}

/// Builder for creating a REST API client.
pub struct RestApiClientBuilder {
    base_url: String,
    http_client: Option<HttpClient>,
    http_client_builder: Option<HttpClientBuilder>,
    default_headers: http::HeaderMap,
    auth: Option<Authentication>,
}

impl RestApiClientBuilder {
    /// Create a new builder with the specified base URL.
    ///
    /// All request paths will be appended to this base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http_client: None,
            http_client_builder: None,
            default_headers: http::HeaderMap::new(),
            auth: None,
        }
    }

    /// Use an existing HTTP client instead of creating a new one.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Use a custom HTTP client builder for advanced configuration.
    pub fn http_client_builder(mut self, builder: HttpClientBuilder) -> Self {
        self.http_client_builder = Some(builder);
        self
    }

    /// Add a default header that will be sent with every request.
    pub fn default_header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.default_headers.insert(name, value);
        }
        self
    }

    /// Set the Accept header.
    pub fn accept(self, media_type: &str) -> Self {
        self.default_header(http::header::ACCEPT, media_type)
    }

    /// Set the Accept header to application/json.
    pub fn accept_json(self) -> Self {
        self.accept("application/json")
    }

    /// Set bearer token authentication.
    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(Authentication::Bearer(token.into()));
        self
    }

    /// Set `Authorization: token <token>` authentication.
    pub fn token_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(Authentication::Token(token.into()));
        self
    }

    /// Set the authentication method.
    pub fn auth(mut self, auth: Option<Authentication>) -> Self {
        self.auth = auth;
        self
    }

    /// Build the REST API client.
    pub fn build(self) -> Result<RestApiClient> {
        let http_client = if let Some(client) = self.http_client {
            client
        } else {
            self.http_client_builder.unwrap_or_default().build()?
        };

        let base_url = self.base_url.trim_end_matches('/').to_string();

        Ok(RestApiClient {
            inner: Arc::new(RestApiClientInner {
                http_client,
                base_url,
                default_headers: self.default_headers,
                auth: self.auth,
            }),
        })
    }
}

struct RestApiClientInner {
    http_client: HttpClient,
    base_url: String,
    default_headers: http::HeaderMap,
    auth: Option<Authentication>,
}

/// A REST API client bound to one base URL.
#[derive(Clone)]
pub struct RestApiClient {
    inner: Arc<RestApiClientInner>,
}

impl RestApiClient {
    /// Create a new builder for configuring a REST API client.
    pub fn builder(base_url: impl Into<String>) -> RestApiClientBuilder {
        RestApiClientBuilder::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Whether requests carry credentials.
    pub fn has_auth(&self) -> bool {
        self.inner.auth.is_some()
    }

    /// Get a reference to the underlying HTTP client.
    pub fn http_client(&self) -> &HttpClient {
        &self.inner.http_client
    }

    /// Create a GET request builder for `path`.
    pub fn get(&self, path: &str) -> RestApiRequestBuilder {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        RestApiRequestBuilder {
            client: self.clone(),
            request: HttpRequest {
                url: format!("{}{}", self.inner.base_url, path),
                headers: self.inner.default_headers.clone(),
                query: Vec::new(),
                timeout: None,
                auth: self.inner.auth.clone(),
            },
        }
    }
}

impl std::fmt::Debug for RestApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestApiClient")
            .field("base_url", &self.inner.base_url)
            .field("has_auth", &self.inner.auth.is_some())
            .finish()
    }
}

/// Builder for REST API requests.
pub struct RestApiRequestBuilder {
    client: RestApiClient,
    request: HttpRequest,
}

impl RestApiRequestBuilder {
    /// Add a header to the request.
    pub fn header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.request.headers.insert(name, value);
        }
        self
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.request.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a query parameter when `value` is present.
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Set a timeout for this specific request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = Some(timeout);
        self
    }

    /// Build the request without sending it.
    pub fn build(self) -> HttpRequest {
        self.request
    }

    /// Send the request and return the response.
    pub async fn send(self) -> Result<HttpResponse> {
        send_request(self.client.http_client(), self.request).await
    }

    /// Send the request, fail on a non-success status and parse the body as
    /// JSON.
    pub async fn json_response<T: DeserializeOwned>(self) -> Result<T> {
        let response = self.send().await?;
        response.error_for_status_with_body().await?.json().await
    }
}
