//! Entry point to an Akeneo instance
//!
//! `AkeneoClient` owns the authenticated HTTP client and hands out one
//! pool per REST resource.

use crate::auth::{Credentials, TokenAuthenticator};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{urljoin, HttpClient, HttpClientConfig};
use crate::pagination::{PageErrorPolicy, ResultCursor};
use crate::resources::{
    AssetFamiliesPool, AssociationTypesPool, AttributeGroupsPool, AttributesPool,
    CategoriesPool, ChannelsPool, CurrenciesPool, FamiliesPool, Gettable, Listable, LocalesPool,
    MeasureFamiliesPool, MediaFilesPool, ProductModelsPool, ProductsPool, PublishedProductsPool,
    ReferenceEntitiesPool, ResourceKind,
};
use crate::types::{ListParams, REST_API_PATH};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Client for one Akeneo instance
#[derive(Debug, Clone)]
pub struct AkeneoClient {
    base_url: String,
    http: Arc<HttpClient>,
    policy: PageErrorPolicy,
}

impl AkeneoClient {
    /// Create a client authenticating with the password grant.
    ///
    /// Every credential must be non-empty.
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Result<Self> {
        let base_url = base_url.into();
        let config = HttpClientConfig::builder()
            .base_url(base_url.clone())
            .build();
        Self::authenticated(base_url, config, credentials)
    }

    /// Create a client on top of an already authenticated session.
    ///
    /// No token exchange happens; the session must authenticate its own
    /// requests, e.g. through default headers.
    pub fn with_session(base_url: impl Into<String>, session: reqwest::Client) -> Self {
        let base_url = base_url.into();
        let config = HttpClientConfig::builder()
            .base_url(base_url.clone())
            .build();
        Self::from_http_client(base_url, Arc::new(HttpClient::with_session(config, session)))
    }

    /// Create a client from a loaded configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let credentials = config.credentials.clone().ok_or_else(|| {
            Error::config("credentials are required: client_id, secret, username and password")
        })?;
        config.validate()?;

        Ok(
            Self::authenticated(config.base_url.clone(), config.http_client_config(), credentials)?
                .with_policy(config.pagination.on_page_error),
        )
    }

    /// Create a client around an existing HTTP client
    pub fn from_http_client(base_url: impl Into<String>, http: Arc<HttpClient>) -> Self {
        Self {
            base_url: base_url.into(),
            http,
            policy: PageErrorPolicy::default(),
        }
    }

    fn authenticated(
        base_url: String,
        config: HttpClientConfig,
        credentials: Credentials,
    ) -> Result<Self> {
        if let Some(field) = credentials.first_missing() {
            return Err(Error::config(format!(
                "missing credential '{field}': expected client_id, secret, username and password"
            )));
        }

        debug!(base_url = %base_url, client_id = %credentials.client_id, "Creating client");
        let http = HttpClient::with_auth(config, credentials)?;
        Ok(Self::from_http_client(base_url, Arc::new(http)))
    }

    /// Set the failure policy of every listing cursor
    #[must_use]
    pub fn with_policy(mut self, policy: PageErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Base URL of the instance
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The shared HTTP client
    pub fn http_client(&self) -> &Arc<HttpClient> {
        &self.http
    }

    /// The token authenticator, unless built on a session
    pub fn authenticator(&self) -> Option<&Arc<TokenAuthenticator>> {
        self.http.authenticator()
    }

    /// Failure policy of listing cursors
    pub fn policy(&self) -> PageErrorPolicy {
        self.policy
    }

    /// Collection URL of a resource kind
    pub fn endpoint(&self, kind: ResourceKind) -> String {
        urljoin(&self.base_url, &[REST_API_PATH, kind.path()])
    }

    /// Association types
    pub fn association_types(&self) -> AssociationTypesPool {
        self.pool(ResourceKind::AssociationTypes, AssociationTypesPool::new)
            .with_policy(self.policy)
    }

    /// Attributes
    pub fn attributes(&self) -> AttributesPool {
        self.pool(ResourceKind::Attributes, AttributesPool::new)
            .with_policy(self.policy)
    }

    /// Attribute groups
    pub fn attribute_groups(&self) -> AttributeGroupsPool {
        self.pool(ResourceKind::AttributeGroups, AttributeGroupsPool::new)
            .with_policy(self.policy)
    }

    /// Categories
    pub fn categories(&self) -> CategoriesPool {
        self.pool(ResourceKind::Categories, CategoriesPool::new)
            .with_policy(self.policy)
    }

    /// Channels
    pub fn channels(&self) -> ChannelsPool {
        self.pool(ResourceKind::Channels, ChannelsPool::new)
            .with_policy(self.policy)
    }

    /// Currencies
    pub fn currencies(&self) -> CurrenciesPool {
        self.pool(ResourceKind::Currencies, CurrenciesPool::new)
            .with_policy(self.policy)
    }

    /// Families
    pub fn families(&self) -> FamiliesPool {
        self.pool(ResourceKind::Families, FamiliesPool::new)
            .with_policy(self.policy)
    }

    /// Locales
    pub fn locales(&self) -> LocalesPool {
        self.pool(ResourceKind::Locales, LocalesPool::new)
            .with_policy(self.policy)
    }

    /// Measure families
    pub fn measure_families(&self) -> MeasureFamiliesPool {
        self.pool(ResourceKind::MeasureFamilies, MeasureFamiliesPool::new)
            .with_policy(self.policy)
    }

    /// Media files
    pub fn media_files(&self) -> MediaFilesPool {
        self.pool(ResourceKind::MediaFiles, MediaFilesPool::new)
            .with_policy(self.policy)
    }

    /// Products
    pub fn products(&self) -> ProductsPool {
        self.pool(ResourceKind::Products, ProductsPool::new)
            .with_policy(self.policy)
    }

    /// Product models
    pub fn product_models(&self) -> ProductModelsPool {
        self.pool(ResourceKind::ProductModels, ProductModelsPool::new)
            .with_policy(self.policy)
    }

    /// Published products
    pub fn published_products(&self) -> PublishedProductsPool {
        self.pool(ResourceKind::PublishedProducts, PublishedProductsPool::new)
            .with_policy(self.policy)
    }

    /// Asset families
    pub fn asset_families(&self) -> AssetFamiliesPool {
        self.pool(ResourceKind::AssetFamilies, AssetFamiliesPool::new)
            .with_policy(self.policy)
    }

    /// Reference entities
    pub fn reference_entities(&self) -> ReferenceEntitiesPool {
        self.pool(ResourceKind::ReferenceEntities, ReferenceEntitiesPool::new)
            .with_policy(self.policy)
    }

    fn pool<T>(&self, kind: ResourceKind, build: impl FnOnce(String, Arc<HttpClient>) -> T) -> T {
        build(self.endpoint(kind), self.http.clone())
    }

    /// List any resource kind
    pub async fn fetch_list(&self, kind: ResourceKind, params: ListParams) -> Result<ResultCursor> {
        match kind {
            ResourceKind::AssociationTypes => self.association_types().fetch_list(params).await,
            ResourceKind::Attributes => self.attributes().fetch_list(params).await,
            ResourceKind::AttributeGroups => self.attribute_groups().fetch_list(params).await,
            ResourceKind::Categories => self.categories().fetch_list(params).await,
            ResourceKind::Channels => self.channels().fetch_list(params).await,
            ResourceKind::Currencies => self.currencies().fetch_list(params).await,
            ResourceKind::Families => self.families().fetch_list(params).await,
            ResourceKind::Locales => self.locales().fetch_list(params).await,
            ResourceKind::MeasureFamilies => self.measure_families().fetch_list(params).await,
            ResourceKind::MediaFiles => self.media_files().fetch_list(params).await,
            ResourceKind::Products => self.products().fetch_list(params).await,
            ResourceKind::ProductModels => self.product_models().fetch_list(params).await,
            ResourceKind::PublishedProducts => self.published_products().fetch_list(params).await,
            ResourceKind::AssetFamilies => self.asset_families().fetch_list(params).await,
            ResourceKind::ReferenceEntities => self.reference_entities().fetch_list(params).await,
        }
    }

    /// Fetch one item of any gettable resource kind
    pub async fn fetch_item(&self, kind: ResourceKind, code: &str) -> Result<Value> {
        match kind {
            ResourceKind::AssociationTypes => self.association_types().fetch_item(code).await,
            ResourceKind::Attributes => self.attributes().fetch_item(code).await,
            ResourceKind::AttributeGroups => self.attribute_groups().fetch_item(code).await,
            ResourceKind::Categories => self.categories().fetch_item(code).await,
            ResourceKind::Channels => self.channels().fetch_item(code).await,
            ResourceKind::Families => self.families().fetch_item(code).await,
            ResourceKind::Locales => self.locales().fetch_item(code).await,
            ResourceKind::MeasureFamilies => self.measure_families().fetch_item(code).await,
            ResourceKind::MediaFiles => self.media_files().fetch_item(code).await,
            ResourceKind::Products => self.products().fetch_item(code).await,
            ResourceKind::ProductModels => self.product_models().fetch_item(code).await,
            ResourceKind::PublishedProducts => self.published_products().fetch_item(code).await,
            ResourceKind::AssetFamilies => self.asset_families().fetch_item(code).await,
            ResourceKind::ReferenceEntities => self.reference_entities().fetch_item(code).await,
            ResourceKind::Currencies => Err(Error::invalid_value(
                "resource",
                format!("{kind} cannot be fetched by code"),
            )),
        }
    }
}
