//! Common types used throughout the client
//!
//! Shared type aliases and the protocol constants of the Akeneo REST API.

use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

/// Parameters for list requests. Non-string values are sent JSON-encoded.
pub type ListParams = HashMap<String, JsonValue>;

// ============================================================================
// Protocol constants
// ============================================================================

/// Path of the REST API, relative to the base URL
pub const REST_API_PATH: &str = "/api/rest/v1/";

/// Path of the OAuth token endpoint, relative to the base URL
pub const TOKEN_PATH: &str = "/api/oauth/v1/token";

/// Content type for single JSON documents
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type for newline-delimited collection updates
pub const COLLECTION_CONTENT_TYPE: &str = "application/vnd.akeneo.collection+json";

/// Maximum number of items accepted by a single collection update
pub const MAX_COLLECTION_ITEMS: usize = 100;

/// Convert list parameters into query pairs.
///
/// Strings are passed through, everything else (search filters, numbers,
/// booleans) is JSON-encoded.
pub fn encode_list_params(params: &ListParams) -> StringMap {
    params
        .iter()
        .map(|(key, value)| {
            let encoded = match value {
                JsonValue::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), encoded)
        })
        .collect()
}
