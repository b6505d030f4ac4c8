//! CLI module
//!
//! Command-line interface over the client.
//!
//! # Commands
//!
//! - `token` - Authenticate and show the token expiry
//! - `resources` - List resource kinds
//! - `list` - Stream the items of a resource
//! - `get` - Fetch one item

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
