//! Authentication module
//!
//! Password and refresh-token grants against the OAuth endpoint.
//!
//! The `TokenAuthenticator` owns the current token pair and attaches a
//! valid bearer token to every request passed through it, requesting or
//! refreshing the token on demand.

mod authenticator;
mod types;

pub use authenticator::TokenAuthenticator;
pub use types::{Credentials, TokenState};
