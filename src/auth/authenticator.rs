//! Token authenticator implementation
//!
//! Handles the password and refresh-token exchanges against the OAuth
//! endpoint and decorates outgoing requests with the bearer token.

use super::types::{Credentials, TokenState};
use crate::error::{Error, Result};
use crate::http::urljoin;
use crate::types::{JSON_CONTENT_TYPE, TOKEN_PATH};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Request};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Obtains and maintains a bearer token for one base URL and credential pair.
///
/// The token is requested lazily on the first request and refreshed on the
/// first request after it expires. A failed exchange leaves the stored
/// token untouched. Exchanges are serialized through an internal mutex, so
/// concurrent callers wait for a single refresh instead of issuing several.
pub struct TokenAuthenticator {
    /// Full URL of the token endpoint
    token_url: String,
    /// Credentials for the password grant
    credentials: Credentials,
    /// Current token pair, if one was obtained
    state: Mutex<Option<TokenState>>,
    /// HTTP client for token requests
    http_client: Client,
}

impl TokenAuthenticator {
    /// Create a new authenticator for the given base URL
    pub fn new(base_url: &str, credentials: Credentials) -> Self {
        Self::with_client(base_url, credentials, Client::new())
    }

    /// Create an authenticator with a custom HTTP client
    pub fn with_client(base_url: &str, credentials: Credentials, http_client: Client) -> Self {
        Self {
            token_url: urljoin(base_url, &[TOKEN_PATH]),
            credentials,
            state: Mutex::new(None),
            http_client,
        }
    }

    /// Ensure a valid token and attach it to the request.
    ///
    /// Sets `Authorization: Bearer <token>`, and `Content-Type:
    /// application/json` when the request does not carry a content type yet.
    pub async fn authenticate(&self, mut request: Request) -> Result<Request> {
        let access_token = self.current_access_token().await?;

        let bearer = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|e| Error::Other(format!("Access token is not a valid header value: {e}")))?;
        let headers = request.headers_mut();
        headers.insert(AUTHORIZATION, bearer);
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }

        Ok(request)
    }

    /// Exchange the credentials for a new token pair and store it
    pub async fn request_token(&self) -> Result<TokenState> {
        let mut state = self.state.lock().await;
        let fresh = self.exchange(&self.password_grant()).await?;
        *state = Some(fresh.clone());
        Ok(fresh)
    }

    /// Exchange the stored refresh token for a new token pair and store it.
    ///
    /// Never falls back to the password grant.
    pub async fn refresh_token(&self) -> Result<TokenState> {
        let mut state = self.state.lock().await;
        let refresh_token = state
            .as_ref()
            .map(|s| s.refresh_token.clone())
            .ok_or_else(|| Error::auth(0, "No refresh token available, request a token first"))?;

        let fresh = self
            .exchange(&TokenGrant::RefreshToken {
                refresh_token: &refresh_token,
            })
            .await?;
        *state = Some(fresh.clone());
        Ok(fresh)
    }

    /// True if no token was obtained yet or the stored one has expired
    pub async fn should_refresh(&self) -> bool {
        self.should_refresh_at(Utc::now()).await
    }

    /// Same as [`should_refresh`](Self::should_refresh) for a given instant
    pub async fn should_refresh_at(&self, now: DateTime<Utc>) -> bool {
        self.state
            .lock()
            .await
            .as_ref()
            .map_or(true, |s| s.is_expired_at(now))
    }

    /// Snapshot of the current token pair
    pub async fn token_state(&self) -> Option<TokenState> {
        self.state.lock().await.clone()
    }

    /// Install a previously obtained token pair without a network call
    pub async fn restore(&self, token: TokenState) {
        *self.state.lock().await = Some(token);
    }

    /// Drop the stored token so the next request starts from the credentials
    pub async fn clear(&self) {
        *self.state.lock().await = None;
    }

    /// Full URL of the token endpoint
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Credentials used for the password grant
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Return a valid access token, running the refresh policy if needed
    async fn current_access_token(&self) -> Result<String> {
        let mut state = self.state.lock().await;

        if let Some(current) = state.as_ref() {
            if !current.is_expired() {
                return Ok(current.access_token.clone());
            }
        }

        let refresh_token = state.as_ref().map(|s| s.refresh_token.clone());
        let fresh = match refresh_token {
            Some(refresh_token) => {
                debug!("Access token expired, refreshing");
                self.exchange(&TokenGrant::RefreshToken {
                    refresh_token: &refresh_token,
                })
                .await?
            }
            None => self.exchange(&self.password_grant()).await?,
        };

        let access_token = fresh.access_token.clone();
        *state = Some(fresh);
        Ok(access_token)
    }

    fn password_grant(&self) -> TokenGrant<'_> {
        TokenGrant::Password {
            username: &self.credentials.username,
            password: &self.credentials.password,
        }
    }

    /// Run one exchange against the token endpoint. Does not touch the state.
    async fn exchange(&self, grant: &TokenGrant<'_>) -> Result<TokenState> {
        info!(grant = grant.name(), url = %self.token_url, "Requesting access token");

        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.secret))
            .json(grant)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::auth(status, body));
        }

        let token_response: TokenResponse = response.json().await.map_err(Error::Http)?;
        let token = token_response.into_token_state()?;
        debug!(expires_at = %token.expires_at, "Access token obtained");
        Ok(token)
    }
}

impl std::fmt::Debug for TokenAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthenticator")
            .field("token_url", &self.token_url)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Body of a token request
#[derive(Debug, Serialize)]
#[serde(tag = "grant_type", rename_all = "snake_case")]
enum TokenGrant<'a> {
    Password {
        username: &'a str,
        password: &'a str,
    },
    RefreshToken {
        refresh_token: &'a str,
    },
}

impl TokenGrant<'_> {
    fn name(&self) -> &'static str {
        match self {
            TokenGrant::Password { .. } => "password",
            TokenGrant::RefreshToken { .. } => "refresh_token",
        }
    }
}

/// OAuth token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
}

impl TokenResponse {
    fn into_token_state(self) -> Result<TokenState> {
        TokenState::expires_in(self.access_token, self.refresh_token, self.expires_in)
    }
}
