//! Pagination module
//!
//! Turns a paginated listing into a single lazy sequence of items.
//!
//! # Overview
//!
//! A listing response is either an envelope (`_links` with `self`, `first`
//! and an optional `next`, items under `_embedded.items`) or a bare array.
//! Both are normalized into a [`Page`]. The [`ResultCursor`] yields the
//! items of its page and follows `next` links on demand through a
//! [`Transport`](crate::http::Transport).

mod cursor;
mod types;

pub use cursor::ResultCursor;
pub use types::{Page, PageErrorPolicy, PageFailure};
