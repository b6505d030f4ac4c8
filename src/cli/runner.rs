//! CLI runner - executes commands

use crate::auth::Credentials;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::AkeneoClient;
use crate::config::{load_config, ClientConfig};
use crate::error::{Error, Result};
use crate::resources::{ListPagination, ResourceKind};
use crate::types::ListParams;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Token => self.token().await,
            Commands::Resources => {
                self.resources();
                Ok(())
            }
            Commands::List {
                resource,
                search,
                limit,
                max_items,
            } => {
                self.list(resource, search.as_deref(), *limit, *max_items)
                    .await
            }
            Commands::Get { resource, code } => self.get(resource, code).await,
        }
    }

    /// Build the client config from the config file and the flags.
    ///
    /// Flags (and their environment variables) override the file.
    fn resolve_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => load_config(path)?,
            None => ClientConfig::default(),
        };

        if let Some(base_url) = &self.cli.base_url {
            config.base_url.clone_from(base_url);
        }

        let flags = [
            &self.cli.client_id,
            &self.cli.secret,
            &self.cli.username,
            &self.cli.password,
        ];
        if flags.iter().any(|flag| flag.is_some()) {
            let mut credentials = config
                .credentials
                .take()
                .unwrap_or_else(|| Credentials::new("", "", "", ""));
            let fields = [
                &mut credentials.client_id,
                &mut credentials.secret,
                &mut credentials.username,
                &mut credentials.password,
            ];
            for (field, flag) in fields.into_iter().zip(flags) {
                if let Some(value) = flag {
                    field.clone_from(value);
                }
            }
            config.credentials = Some(credentials);
        }

        if config.base_url.is_empty() {
            return Err(Error::config(
                "Base URL not specified (use --base-url, AKENEO_BASE_URL or a config file)",
            ));
        }

        Ok(config)
    }

    fn client(&self) -> Result<AkeneoClient> {
        AkeneoClient::from_config(&self.resolve_config()?)
    }

    /// Authenticate and report the token expiry
    async fn token(&self) -> Result<()> {
        let client = self.client()?;
        let authenticator = client
            .authenticator()
            .ok_or_else(|| Error::config("Client has no authenticator"))?;

        let token = authenticator.request_token().await?;
        self.output_message(&json!({
            "type": "TOKEN",
            "token_url": authenticator.token_url(),
            "expires_at": token.expires_at.to_rfc3339(),
        }));
        Ok(())
    }

    /// Describe every resource kind
    fn resources(&self) {
        for kind in ResourceKind::ALL {
            self.output_message(&describe_kind(kind));
        }
    }

    /// Stream the items of a resource
    async fn list(
        &self,
        resource: &str,
        search: Option<&str>,
        limit: Option<u32>,
        max_items: Option<usize>,
    ) -> Result<()> {
        let kind: ResourceKind = resource.parse()?;
        let params = build_list_params(search, limit)?;

        let client = self.client()?;
        let mut cursor = client.fetch_list(kind, params).await?;

        let mut emitted = 0usize;
        while max_items.map_or(true, |max| emitted < max) {
            let Some(item) = cursor.next_item().await? else {
                break;
            };
            self.output_message(&item);
            emitted += 1;
        }

        if let Some(failure) = cursor.last_failure() {
            warn!(
                url = %failure.url,
                status = ?failure.status,
                "Listing ended early: {}",
                failure.message
            );
        }
        debug!(items = emitted, pages = cursor.pages_fetched(), "Listing done");
        Ok(())
    }

    /// Fetch one item
    async fn get(&self, resource: &str, code: &str) -> Result<()> {
        let kind: ResourceKind = resource.parse()?;
        let client = self.client()?;
        let item = client.fetch_item(kind, code).await?;
        self.output_message(&item);
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

fn describe_kind(kind: ResourceKind) -> Value {
    let profile = kind.profile();
    json!({
        "name": kind.name(),
        "path": kind.path(),
        "code_field": profile.code_field.as_str(),
        "search_after": profile.pagination == ListPagination::SearchAfter,
        "gettable": profile.supports("Gettable"),
        "capabilities": profile.capabilities,
    })
}

fn build_list_params(search: Option<&str>, limit: Option<u32>) -> Result<ListParams> {
    let mut params = ListParams::new();

    if let Some(search) = search {
        let filter: Value = serde_json::from_str(search)
            .map_err(|e| Error::invalid_value("search", e.to_string()))?;
        params.insert("search".to_string(), filter);
    }
    if let Some(limit) = limit {
        params.insert("limit".to_string(), json!(limit));
    }

    Ok(params)
}
