//! Authenticated HTTP client
//!
//! Provides the transport every resource operation and every page fetch
//! goes through:
//! - Bearer authentication through the `TokenAuthenticator`
//! - Optional client-side rate limiting
//! - Default headers, base URL resolution and request timeouts
//!
//! No request is ever retried. Callers that want retries wrap the calls and
//! use `Error::is_retryable` to decide.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{Credentials, TokenAuthenticator};
use crate::error::{Error, Result};
use crate::types::{StringMap, JSON_CONTENT_TYPE};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for relative request paths and the token endpoint
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers, applied when the request does not set them itself
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string());

        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            rate_limit: None,
            default_headers,
            user_agent: format!("akeneo-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Body of a request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON document, sent compact with `application/json`
    Json(Value),
    /// Pre-serialized payload with its own content type
    Raw {
        /// Content type header value
        content_type: String,
        /// Payload
        data: String,
    },
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: StringMap,
    /// Request headers
    pub headers: StringMap,
    /// Request body
    pub body: Option<RequestBody>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add several query parameters
    #[must_use]
    pub fn queries(mut self, params: StringMap) -> Self {
        self.query.extend(params);
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Set a raw body with its content type
    #[must_use]
    pub fn raw(mut self, content_type: impl Into<String>, data: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Raw {
            content_type: content_type.into(),
            data: data.into(),
        });
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A fully read HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Value of a header, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Parse the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Turn a non-2xx response into `Error::HttpStatus`
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::http_status(self.status, self.body))
        }
    }
}

/// The fetch capability the pagination cursor and resources depend on.
///
/// Returns the response whatever its status; only connection-level failures
/// are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one request
    async fn execute(&self, method: Method, url: &str, config: RequestConfig)
        -> Result<HttpResponse>;
}

/// HTTP client with bearer authentication and optional rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Option<Arc<TokenAuthenticator>>,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Http)?;

        Ok(Self::from_parts(client, config))
    }

    /// Create a client that authenticates with the given credentials.
    ///
    /// The token endpoint is derived from `config.base_url`, which is
    /// therefore required.
    pub fn with_auth(config: HttpClientConfig, credentials: Credentials) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| Error::missing_field("base_url"))?;

        let mut client = Self::with_config(config)?;
        client.authenticator = Some(Arc::new(TokenAuthenticator::with_client(
            &base_url,
            credentials,
            client.client.clone(),
        )));
        Ok(client)
    }

    /// Wrap an externally authenticated `reqwest::Client`.
    ///
    /// No token exchange happens; the given client is expected to carry its
    /// own authentication. `config.timeout` and `config.user_agent` are not
    /// applied to it.
    pub fn with_session(config: HttpClientConfig, session: Client) -> Self {
        Self::from_parts(session, config)
    }

    fn from_parts(client: Client, config: HttpClientConfig) -> Self {
        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Self {
            client,
            config,
            authenticator: None,
            rate_limiter,
        }
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Get the authenticator, if this client authenticates itself
    pub fn authenticator(&self) -> Option<&Arc<TokenAuthenticator>> {
        self.authenticator.as_ref()
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Make a GET request, failing on non-2xx
    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.request(Method::GET, url, RequestConfig::default())
            .await
    }

    /// Make a GET request with config, failing on non-2xx
    pub async fn get_with_config(&self, url: &str, config: RequestConfig) -> Result<HttpResponse> {
        self.request(Method::GET, url, config).await
    }

    /// Make a GET request and parse the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get(url).await?.json()
    }

    /// Make a POST request with a JSON body, failing on non-2xx
    pub async fn post(&self, url: &str, body: Value) -> Result<HttpResponse> {
        self.request(Method::POST, url, RequestConfig::default().json(body))
            .await
    }

    /// Make a PATCH request with a JSON body, failing on non-2xx
    pub async fn patch(&self, url: &str, body: Value) -> Result<HttpResponse> {
        self.request(Method::PATCH, url, RequestConfig::default().json(body))
            .await
    }

    /// Make a DELETE request, failing on non-2xx
    pub async fn delete(&self, url: &str) -> Result<HttpResponse> {
        self.request(Method::DELETE, url, RequestConfig::default())
            .await
    }

    /// Make a request, failing with `Error::HttpStatus` on non-2xx
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<HttpResponse> {
        self.send(method, url, config).await?.error_for_status()
    }

    /// Make a request and return the response whatever its status
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<HttpResponse> {
        let full_url = self.build_url(url);
        let timeout = config.timeout.unwrap_or(self.config.timeout);

        // Wait for rate limiter
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let mut req = self.client.request(method.clone(), &full_url);

        for (key, value) in &config.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if !config.query.is_empty() {
            req = req.query(&config.query);
        }

        match config.body {
            Some(RequestBody::Json(ref body)) => {
                req = req
                    .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                    .body(serde_json::to_string(body)?);
            }
            Some(RequestBody::Raw {
                ref content_type,
                ref data,
            }) => {
                req = req
                    .header(CONTENT_TYPE, content_type.as_str())
                    .body(data.clone());
            }
            None => {}
        }

        let mut request = req.timeout(timeout).build().map_err(Error::Http)?;

        // Defaults only fill in what the request left unset
        for (key, value) in &self.config.default_headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| Error::invalid_value("default_headers", e.to_string()))?;
            if !request.headers().contains_key(&name) {
                let value = HeaderValue::from_str(value)
                    .map_err(|e| Error::invalid_value("default_headers", e.to_string()))?;
                request.headers_mut().insert(name, value);
            }
        }

        if let Some(ref auth) = self.authenticator {
            request = auth.authenticate(request).await?;
        }

        debug!("Sending {} {}", method, full_url);
        let response = self.client.execute(request).await.map_err(Error::Http)?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(Error::Http)?;
        debug!("Received {} for {} {}", status, method, full_url);

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn execute(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<HttpResponse> {
        self.send(method, url, config).await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_authenticator", &self.authenticator.is_some())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
