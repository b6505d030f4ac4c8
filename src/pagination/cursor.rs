//! Lazy, page-following result cursor

use super::types::{Page, PageErrorPolicy, PageFailure};
use crate::error::Result;
use crate::http::{RequestConfig, Transport};
use futures::Stream;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// A server-paginated listing exposed as one forward-only sequence.
///
/// Items of the current page are yielded in order; when the page runs out
/// the cursor follows its `next` link through the transport and continues
/// with the new page. Once the last page is consumed the cursor is spent and
/// cannot be restarted.
pub struct ResultCursor {
    transport: Arc<dyn Transport>,
    page: Page,
    position: usize,
    reached_end: bool,
    policy: PageErrorPolicy,
    last_failure: Option<PageFailure>,
    pages_fetched: usize,
}

impl ResultCursor {
    /// Create a cursor positioned at the start of `page`
    pub fn new(transport: Arc<dyn Transport>, page: Page) -> Self {
        Self {
            transport,
            page,
            position: 0,
            reached_end: false,
            policy: PageErrorPolicy::default(),
            last_failure: None,
            pages_fetched: 1,
        }
    }

    /// Create a cursor from a parsed listing body (envelope or bare array)
    pub fn from_response(transport: Arc<dyn Transport>, body: Value) -> Result<Self> {
        Ok(Self::new(transport, Page::from_response(body)?))
    }

    /// Set the policy for failed next-page fetches
    #[must_use]
    pub fn with_policy(mut self, policy: PageErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Next item, fetching the following page when the current one is spent.
    ///
    /// Returns `Ok(None)` at the end of the collection, and forever after.
    pub async fn next_item(&mut self) -> Result<Option<Value>> {
        loop {
            if let Some(item) = self.page.items.get(self.position) {
                self.position += 1;
                return Ok(Some(item.clone()));
            }

            if self.reached_end || !self.fetch_next_page().await? {
                return Ok(None);
            }
        }
    }

    /// Replace the current page with the next one.
    ///
    /// Returns `false`, and marks the cursor as finished, when there is no
    /// next link or the fetch failed under `PageErrorPolicy::EndOfSequence`.
    /// Once finished every call returns `false` without a request.
    pub async fn fetch_next_page(&mut self) -> Result<bool> {
        if self.reached_end {
            return Ok(false);
        }

        let Some(next) = self.page.link_next.clone() else {
            self.reached_end = true;
            return Ok(false);
        };

        debug!(url = %next, "Fetching next page");
        let response = match self
            .transport
            .execute(Method::GET, &next, RequestConfig::new())
            .await
            .and_then(|response| response.error_for_status())
        {
            Ok(response) => response,
            Err(err) => {
                self.reached_end = true;
                self.last_failure = Some(PageFailure::new(&next, &err));
                return match self.policy {
                    PageErrorPolicy::EndOfSequence => {
                        warn!(url = %next, error = %err, "Next page fetch failed, ending iteration");
                        Ok(false)
                    }
                    PageErrorPolicy::Propagate => Err(err),
                };
            }
        };

        // Next links always point at enveloped responses
        let page = match response.json::<Value>().and_then(Page::from_envelope) {
            Ok(page) => page,
            Err(err) => {
                self.reached_end = true;
                self.last_failure = Some(PageFailure::new(&next, &err));
                return Err(err);
            }
        };

        self.page = page;
        self.position = 0;
        self.pages_fetched += 1;
        debug!(
            items = self.page.items.len(),
            pages = self.pages_fetched,
            "Fetched page"
        );
        Ok(true)
    }

    /// Consume the cursor as a stream of items
    pub fn into_stream(self) -> impl Stream<Item = Result<Value>> + Send {
        futures::stream::unfold(Some(self), |state| async move {
            let mut cursor = state?;
            match cursor.next_item().await {
                Ok(Some(item)) => Some((Ok(item), Some(cursor))),
                Ok(None) => None,
                Err(err) => Some((Err(err), None)),
            }
        })
    }

    /// Drain the remaining items into a vector
    pub async fn collect_all(mut self) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        while let Some(item) = self.next_item().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Raw items of the current page, including already yielded ones
    pub fn page_items(&self) -> &[Value] {
        &self.page.items
    }

    /// The current page
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Item count reported by the server for the current page
    pub fn count(&self) -> Option<u64> {
        self.page.count
    }

    /// Link to the first page
    pub fn link_first(&self) -> &str {
        &self.page.link_first
    }

    /// Link to the next page, if any
    pub fn link_next(&self) -> Option<&str> {
        self.page.link_next.as_deref()
    }

    /// Link to the current page
    pub fn link_self(&self) -> &str {
        &self.page.link_self
    }

    /// True once no further page will be fetched
    pub fn is_exhausted(&self) -> bool {
        self.reached_end
    }

    /// The failed next-page fetch that ended the sequence, if any
    pub fn last_failure(&self) -> Option<&PageFailure> {
        self.last_failure.as_ref()
    }

    /// The active failure policy
    pub fn policy(&self) -> PageErrorPolicy {
        self.policy
    }

    /// Number of pages loaded so far, the first one included
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

impl std::fmt::Debug for ResultCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCursor")
            .field("page", &self.page)
            .field("position", &self.position)
            .field("reached_end", &self.reached_end)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
