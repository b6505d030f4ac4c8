// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Akeneo Client
//!
//! An async client for the Akeneo PIM REST API.
//!
//! ## Features
//!
//! - **Self-refreshing auth**: Password grant on first use, refresh-token
//!   grant on expiry, bearer header on every request
//! - **Lazy pagination**: Listings are exposed as a single forward-only
//!   cursor that follows `next` links on demand
//! - **Typed resources**: One pool per endpoint, implementing exactly the
//!   operations the endpoint supports
//! - **Rate Limiting**: Optional client-side token bucket
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use akeneo_client::{AkeneoClient, Credentials, Listable, ListParams, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = AkeneoClient::new(
//!         "https://pim.example.com",
//!         Credentials::new("client_id", "secret", "admin", "password"),
//!     )?;
//!
//!     let mut products = client.products().fetch_list(ListParams::new()).await?;
//!     while let Some(product) = products.next_item().await? {
//!         println!("{}", product["identifier"]);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        AkeneoClient                         │
//! │   products()  families()  locales()  ...  fetch_list(kind)  │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────────┬──────────────┴─────┬─────────────────────────┐
//! │  Resources   │    Pagination      │          HTTP           │
//! ├──────────────┼────────────────────┼─────────────────────────┤
//! │ Creatable    │ Page               │ HttpClient / Transport  │
//! │ Gettable     │ ResultCursor       │ TokenAuthenticator      │
//! │ Listable     │ PageErrorPolicy    │ RateLimiter             │
//! │ Updatable... │                    │                         │
//! └──────────────┴────────────────────┴─────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and protocol constants
pub mod types;

/// OAuth token handling
pub mod auth;

/// HTTP client with authentication and rate limiting
pub mod http;

/// Lazy page-following cursors
pub mod pagination;

/// Resource pools and their capabilities
pub mod resources;

/// Client configuration
pub mod config;

/// Top-level client
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::{Credentials, TokenAuthenticator, TokenState};
pub use client::AkeneoClient;
pub use config::{load_config, ClientConfig};
pub use http::{HttpClient, HttpClientConfig, Transport};
pub use pagination::{Page, PageErrorPolicy, ResultCursor};
pub use resources::{
    Creatable, Deletable, Gettable, Listable, Resource, ResourceKind, Updatable, UpdatableList,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
