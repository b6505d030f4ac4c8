//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for the Akeneo PIM REST API
#[derive(Parser, Debug)]
#[command(name = "akeneo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the instance
    #[arg(long, global = true, env = "AKENEO_BASE_URL")]
    pub base_url: Option<String>,

    /// API client id
    #[arg(long, global = true, env = "AKENEO_CLIENT_ID")]
    pub client_id: Option<String>,

    /// API client secret
    #[arg(long, global = true, env = "AKENEO_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Connection username
    #[arg(long, global = true, env = "AKENEO_USERNAME")]
    pub username: Option<String>,

    /// Connection password
    #[arg(long, global = true, env = "AKENEO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Request an access token and print its expiry
    Token,

    /// List the resource kinds of the API
    Resources,

    /// Stream the items of a resource, one document per line
    List {
        /// Resource kind, e.g. `products` or `product-models`
        resource: String,

        /// Search filter as JSON
        #[arg(long)]
        search: Option<String>,

        /// Page size requested from the server
        #[arg(long)]
        limit: Option<u32>,

        /// Stop after this many items
        #[arg(long)]
        max_items: Option<usize>,
    },

    /// Fetch one item by code
    Get {
        /// Resource kind
        resource: String,

        /// Item code or product identifier
        code: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}
