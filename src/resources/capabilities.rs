//! Resource capabilities
//!
//! Each capability is a trait with a default implementation written against
//! [`Resource`]. A pool opts into exactly the operations its endpoint
//! supports by implementing the matching traits.

use super::types::{CodeField, ListPagination};
use crate::error::{Error, Result};
use crate::http::{item_url, HttpClient, HttpResponse, RequestConfig, Transport};
use crate::pagination::{PageErrorPolicy, ResultCursor};
use crate::types::{
    encode_list_params, ListParams, COLLECTION_CONTENT_TYPE, MAX_COLLECTION_ITEMS,
};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Query parameter selecting the pagination mode
pub const PAGINATION_TYPE_PARAM: &str = "pagination_type";

/// A handle on one REST endpoint
pub trait Resource: Send + Sync {
    /// Absolute URL of the collection
    fn endpoint(&self) -> &str;

    /// Client the requests go through
    fn client(&self) -> &Arc<HttpClient>;

    /// Field identifying an item
    fn code_field(&self) -> CodeField;

    /// Pagination mode of listings
    fn pagination(&self) -> ListPagination {
        ListPagination::Page
    }

    /// Failure policy handed to listing cursors
    fn page_policy(&self) -> PageErrorPolicy {
        PageErrorPolicy::default()
    }

    /// Extract the code of an item
    fn code_of(&self, item: &Value) -> Result<String> {
        let field = self.code_field().as_str();
        item.get(field)
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| Error::invalid_value(field, "item has no string code"))
    }

    /// URL of a single item
    fn item_url(&self, code: &str) -> Result<String> {
        item_url(self.endpoint(), code)
    }
}

/// Items can be created with POST
#[async_trait]
pub trait Creatable: Resource {
    /// Create one item
    async fn create_item(&self, item: &Value) -> Result<()> {
        self.client().post(self.endpoint(), item.clone()).await?;
        Ok(())
    }
}

/// Items can be fetched by code
#[async_trait]
pub trait Gettable: Resource {
    /// Fetch one item as a JSON document
    async fn fetch_item(&self, code: &str) -> Result<Value> {
        let url = self.item_url(code)?;
        self.client().get_json(&url).await
    }
}

/// The collection can be listed
#[async_trait]
pub trait Listable: Resource {
    /// List the collection.
    ///
    /// String parameters are sent as-is, others JSON-encoded (`search`
    /// filters in particular). The returned cursor follows the pages lazily.
    async fn fetch_list(&self, params: ListParams) -> Result<ResultCursor> {
        let mut params = params;
        if self.pagination() == ListPagination::SearchAfter {
            params
                .entry(PAGINATION_TYPE_PARAM.to_string())
                .or_insert_with(|| Value::from("search_after"));
        }

        let config = RequestConfig::new().queries(encode_list_params(&params));
        let body: Value = self
            .client()
            .get_with_config(self.endpoint(), config)
            .await?
            .json()?;

        let transport: Arc<dyn Transport> = self.client().clone();
        Ok(ResultCursor::from_response(transport, body)?.with_policy(self.page_policy()))
    }
}

/// Items can be created or updated one at a time with PATCH
#[async_trait]
pub trait Updatable: Resource {
    /// Create or update one item.
    ///
    /// The code is taken from the item when not given. Returns the
    /// `Location` header of the response.
    async fn update_create_item(
        &self,
        item: &Value,
        code: Option<&str>,
    ) -> Result<Option<String>> {
        let code = match code {
            Some(code) => code.to_string(),
            None => self.code_of(item)?,
        };

        let url = self.item_url(&code)?;
        let response = self.client().patch(&url, item.clone()).await?;
        Ok(response.header("Location").map(ToString::to_string))
    }
}

/// Items can be created or updated in bulk
#[async_trait]
pub trait UpdatableList: Resource {
    /// Create or update several items in one collection request.
    ///
    /// When the server rejects the payload as too large the items are sent
    /// again in chunks of at most 100. Returns one status document per item.
    async fn update_create_list(&self, items: &[Value]) -> Result<Vec<Value>> {
        let response = send_collection(self.client(), self.endpoint(), items).await?;

        if response.status != 413 || items.len() <= MAX_COLLECTION_ITEMS {
            return parse_statuses(&response.error_for_status()?);
        }

        info!(
            items = items.len(),
            chunk = MAX_COLLECTION_ITEMS,
            "Collection too large, sending in chunks"
        );
        let mut statuses = Vec::with_capacity(items.len());
        for chunk in items.chunks(MAX_COLLECTION_ITEMS) {
            let response = send_collection(self.client(), self.endpoint(), chunk)
                .await?
                .error_for_status()?;
            statuses.extend(parse_statuses(&response)?);
        }
        Ok(statuses)
    }
}

/// Items can be deleted
#[async_trait]
pub trait Deletable: Resource {
    /// Delete one item
    async fn delete_item(&self, code: &str) -> Result<()> {
        let url = self.item_url(code)?;
        self.client().delete(&url).await?;
        Ok(())
    }
}

async fn send_collection(
    client: &HttpClient,
    endpoint: &str,
    items: &[Value],
) -> Result<HttpResponse> {
    let mut body = String::new();
    for item in items {
        body.push_str(&serde_json::to_string(item)?);
        body.push('\n');
    }

    debug!(items = items.len(), endpoint, "Sending collection update");
    client
        .send(
            Method::PATCH,
            endpoint,
            RequestConfig::new().raw(COLLECTION_CONTENT_TYPE, body),
        )
        .await
}

/// One JSON document per non-empty line
fn parse_statuses(response: &HttpResponse) -> Result<Vec<Value>> {
    response
        .body
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(Error::from))
        .collect()
}
