//! Page model and pagination policy types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One server-returned chunk of a listing.
///
/// `link_next` is `None` exactly on the last page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    /// Items of this page, in server order
    pub items: Vec<Value>,
    /// Total number of items in the collection, when the server reports it
    pub count: Option<u64>,
    /// Link to the first page
    pub link_first: String,
    /// Link to the next page
    pub link_next: Option<String>,
    /// Link to this page
    pub link_self: String,
}

impl Page {
    /// Build a page from any listing body.
    ///
    /// Objects carrying `_links` are parsed as an envelope, bare arrays are
    /// wrapped into a single terminal page.
    pub fn from_response(body: Value) -> Result<Self> {
        if Self::is_paginated(&body) {
            return Self::from_envelope(body);
        }

        match body {
            Value::Array(items) => Ok(Self::from_items(items)),
            other => Err(Error::malformed(format!(
                "expected a paginated envelope or an array of items, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Whether a body is a paginated envelope
    pub fn is_paginated(body: &Value) -> bool {
        body.as_object().is_some_and(|o| o.contains_key("_links"))
    }

    /// Parse a paginated envelope.
    ///
    /// `_links.self.href` and `_links.first.href` are required, a missing
    /// `_embedded.items` is read as an empty page.
    pub fn from_envelope(mut body: Value) -> Result<Self> {
        let links = body
            .get("_links")
            .ok_or_else(|| Error::malformed("missing _links"))?;

        let link_self =
            link_href(links, "self").ok_or_else(|| Error::malformed("missing _links.self.href"))?;
        let link_first = link_href(links, "first")
            .ok_or_else(|| Error::malformed("missing _links.first.href"))?;
        let link_next = link_href(links, "next");
        let count = body.get("items_count").and_then(Value::as_u64);

        let items = match body
            .get_mut("_embedded")
            .and_then(|embedded| embedded.get_mut("items"))
            .map(Value::take)
        {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(Error::malformed(format!(
                    "_embedded.items must be an array, got {}",
                    json_kind(&other)
                )))
            }
        };

        Ok(Self {
            items,
            count,
            link_first,
            link_next,
            link_self,
        })
    }

    /// Wrap a bare list of items into a single terminal page.
    ///
    /// The self link is taken from the first item when it carries one.
    pub fn from_items(items: Vec<Value>) -> Self {
        let link_self = items
            .first()
            .and_then(|item| item.get("_links"))
            .and_then(|links| link_href(links, "self"))
            .unwrap_or_default();

        Self {
            count: Some(items.len() as u64),
            items,
            link_first: String::new(),
            link_next: None,
            link_self,
        }
    }

    /// True if there is no page after this one
    pub fn is_last(&self) -> bool {
        self.link_next.is_none()
    }
}

fn link_href(links: &Value, name: &str) -> Option<String> {
    links
        .get(name)?
        .get("href")?
        .as_str()
        .map(ToString::to_string)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// What the cursor does when fetching a subsequent page fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageErrorPolicy {
    /// End the sequence and keep the items seen so far. The failure stays
    /// available through `ResultCursor::last_failure`.
    #[default]
    EndOfSequence,
    /// End the sequence and return the error to the caller
    Propagate,
}

/// Record of a failed next-page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    /// The `next` link that was being followed
    pub url: String,
    /// HTTP status, when the server answered
    pub status: Option<u16>,
    /// Error description
    pub message: String,
}

impl PageFailure {
    pub(crate) fn new(url: impl Into<String>, error: &Error) -> Self {
        Self {
            url: url.into(),
            status: error.status(),
            message: error.to_string(),
        }
    }
}
