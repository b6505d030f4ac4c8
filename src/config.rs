//! Client configuration
//!
//! A `ClientConfig` describes one Akeneo instance: where it lives, how to
//! authenticate against it, and how the HTTP layer and listings behave.
//! It can be read from YAML or JSON files, from strings, or from the
//! `AKENEO_*` environment variables.

use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::PageErrorPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable holding the instance base URL
pub const ENV_BASE_URL: &str = "AKENEO_BASE_URL";
/// Environment variable holding the API client id
pub const ENV_CLIENT_ID: &str = "AKENEO_CLIENT_ID";
/// Environment variable holding the API client secret
pub const ENV_SECRET: &str = "AKENEO_SECRET";
/// Environment variable holding the connection username
pub const ENV_USERNAME: &str = "AKENEO_USERNAME";
/// Environment variable holding the connection password
pub const ENV_PASSWORD: &str = "AKENEO_PASSWORD";

// ============================================================================
// Client Config
// ============================================================================

/// Configuration of an Akeneo client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the instance, e.g. `https://pim.example.com`
    pub base_url: String,

    /// Password grant credentials
    #[serde(default)]
    pub credentials: Option<Credentials>,

    /// HTTP layer settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Listing behavior
    #[serde(default)]
    pub pagination: PaginationSettings,
}

/// HTTP layer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Client-side rate limit, off when absent
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: None,
            rate_limit: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// Listing behavior
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PaginationSettings {
    /// What a cursor does when a next page cannot be fetched
    #[serde(default)]
    pub on_page_error: PageErrorPolicy,
}

impl ClientConfig {
    /// Create a config for the given instance and credentials
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials: Some(credentials),
            ..Self::default()
        }
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a config from the `AKENEO_*` environment variables.
    ///
    /// The base URL is required. Credentials are set when at least one of
    /// the credential variables is present; unset ones are left empty and
    /// reported by `validate`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup(ENV_BASE_URL).ok_or_else(|| Error::missing_field(ENV_BASE_URL))?;

        let parts = [ENV_CLIENT_ID, ENV_SECRET, ENV_USERNAME, ENV_PASSWORD].map(&lookup);
        let credentials = if parts.iter().any(Option::is_some) {
            let [client_id, secret, username, password] = parts.map(Option::unwrap_or_default);
            Some(Credentials::new(client_id, secret, username, password))
        } else {
            None
        };

        Ok(Self {
            base_url,
            credentials,
            ..Self::default()
        })
    }

    /// Check the base URL and, when present, the credentials
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::missing_field("base_url"));
        }

        let url = Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if let Some(field) = self.credentials.as_ref().and_then(Credentials::first_missing) {
            return Err(Error::missing_field(format!("credentials.{field}")));
        }

        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value("http.timeout_secs", "must be positive"));
        }

        Ok(())
    }

    /// HTTP client settings derived from this config
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.base_url.clone())
            .timeout(Duration::from_secs(self.http.timeout_secs));

        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        if let Some(limit) = self.http.rate_limit {
            builder = builder.rate_limit(limit);
        }

        builder.build()
    }
}

/// Load a client config from a file.
///
/// `.json` files are parsed as JSON, anything else as YAML. The loaded
/// config is validated.
pub fn load_config(path: impl AsRef<Path>) -> Result<ClientConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        ClientConfig::from_json_str(&content)?
    } else {
        ClientConfig::from_yaml_str(&content)?
    };

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    const FULL_YAML: &str = r#"
base_url: "https://pim.example.com"
credentials:
  client_id: "1_abc"
  secret: "s3cret"
  username: "admin"
  password: "admin"
http:
  timeout_secs: 10
  user_agent: "sync-job/1.0"
  rate_limit:
    requests_per_second: 5
pagination:
  on_page_error: propagate
"#;

    #[test]
    fn test_parse_full_yaml() {
        let config = ClientConfig::from_yaml_str(FULL_YAML).unwrap();

        assert_eq!(config.base_url, "https://pim.example.com");
        assert_eq!(
            config.credentials,
            Some(Credentials::new("1_abc", "s3cret", "admin", "admin"))
        );
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.http.rate_limit, Some(RateLimiterConfig::new(5, 1)));
        assert_eq!(config.pagination.on_page_error, PageErrorPolicy::Propagate);
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_minimal_yaml_uses_defaults() {
        let config = ClientConfig::from_yaml_str("base_url: http://localhost:8080").unwrap();

        assert!(config.credentials.is_none());
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.http.user_agent.is_none());
        assert!(config.http.rate_limit.is_none());
        assert_eq!(config.pagination.on_page_error, PageErrorPolicy::EndOfSequence);
    }

    #[test]
    fn test_parse_json() {
        let config = ClientConfig::from_json_str(
            r#"{"base_url": "http://localhost", "pagination": {"on_page_error": "end_of_sequence"}}"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost");
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = ClientConfig::from_yaml_str("base_url: [unclosed").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = ClientConfig::default();
        assert!(matches!(
            config.validate(),
            Err(Error::MissingConfigField { .. })
        ));

        config.base_url = "not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfigValue { .. })
        ));

        config.base_url = "ftp://pim.example.com".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("ftp"));
    }

    #[test]
    fn test_validate_reports_missing_credential() {
        let config = ClientConfig::new(
            "https://pim.example.com",
            Credentials::new("id", "", "admin", "admin"),
        );
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required config field: credentials.secret"
        );
    }

    #[test]
    fn test_http_client_config() {
        let config = ClientConfig::from_yaml_str(FULL_YAML).unwrap();
        let http = config.http_client_config();

        assert_eq!(http.base_url.as_deref(), Some("https://pim.example.com"));
        assert_eq!(http.timeout, Duration::from_secs(10));
        assert_eq!(http.user_agent, "sync-job/1.0");
        assert!(http.rate_limit.is_some());
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_BASE_URL, "http://pim"),
            (ENV_CLIENT_ID, "id"),
            (ENV_SECRET, "secret"),
            (ENV_USERNAME, "user"),
            (ENV_PASSWORD, "pass"),
        ]
        .into_iter()
        .collect();

        let config =
            ClientConfig::from_lookup(|name| vars.get(name).map(ToString::to_string)).unwrap();
        assert_eq!(config.base_url, "http://pim");
        assert_eq!(
            config.credentials,
            Some(Credentials::new("id", "secret", "user", "pass"))
        );
    }

    #[test]
    fn test_from_lookup_partial_credentials() {
        let config = ClientConfig::from_lookup(|name| match name {
            ENV_BASE_URL => Some("http://pim".to_string()),
            ENV_CLIENT_ID => Some("id".to_string()),
            _ => None,
        })
        .unwrap();

        assert!(config.credentials.is_some());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_lookup_requires_base_url() {
        let err = ClientConfig::from_lookup(|_| None).unwrap_err();
        assert!(err.to_string().contains(ENV_BASE_URL));
    }

    #[test]
    fn test_load_config_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(FULL_YAML.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.http.user_agent.as_deref(), Some("sync-job/1.0"));
    }

    #[test]
    fn test_load_config_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"base_url": "https://pim.example.com"}"#)
            .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.base_url, "https://pim.example.com");
    }

    #[test]
    fn test_load_config_validates() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(b"base_url: \"\"\n").unwrap();

        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config("/nonexistent/akeneo.yaml").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
