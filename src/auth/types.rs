//! Credential and token types
//!
//! `Credentials` are fixed for the lifetime of an authenticator,
//! `TokenState` is replaced as a whole on every successful exchange.

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Credentials for the password grant
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// API client id
    pub client_id: String,
    /// API client secret
    pub secret: String,
    /// Username of the connection user
    pub username: String,
    /// Password of the connection user
    pub password: String,
}

impl Credentials {
    /// Create a new set of credentials
    pub fn new(
        client_id: impl Into<String>,
        secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            secret: secret.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Name of the first empty field, if any
    pub fn first_missing(&self) -> Option<&'static str> {
        [
            ("client_id", &self.client_id),
            ("secret", &self.secret),
            ("username", &self.username),
            ("password", &self.password),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("secret", &"***")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// The current access/refresh token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    /// Bearer token sent on every request
    pub access_token: String,
    /// Token used to obtain the next pair
    pub refresh_token: String,
    /// When the access token stops being valid
    pub expires_at: DateTime<Utc>,
}

impl TokenState {
    /// Create a token state with an absolute expiry
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_at,
        }
    }

    /// Create a token state that expires N seconds from now.
    ///
    /// Fails when the expiry falls outside the representable date range.
    pub fn expires_in(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        seconds: i64,
    ) -> Result<Self> {
        let expires_at = Duration::try_seconds(seconds)
            .and_then(|delta| Utc::now().checked_add_signed(delta))
            .ok_or_else(|| Error::malformed(format!("invalid expires_in: {seconds}")))?;
        Ok(Self::new(access_token, refresh_token, expires_at))
    }

    /// Check if the token is expired at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Check if the token is expired now
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
