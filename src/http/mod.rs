//! HTTP client module
//!
//! The authenticated transport shared by resource operations and the
//! pagination cursor.
//!
//! # Features
//!
//! - **Authentication**: Bearer token injection via the auth module
//! - **Rate Limiting**: Optional token bucket rate limiter using governor
//! - **Transport trait**: The narrow fetch interface the cursor depends on

mod client;
mod rate_limit;
mod urls;

pub use client::{
    HttpClient, HttpClientConfig, HttpClientConfigBuilder, HttpResponse, RequestBody,
    RequestConfig, Transport,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use urls::{item_url, urljoin};
