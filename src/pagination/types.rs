//! Pagination types and traits
//!
//! Defines the page request/result contracts a list operation must satisfy
//! to be driven by a [`Pager`](super::Pager).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameters of a single list call.
///
/// Implemented by every request-parameter shape that supports cursor
/// pagination. The pager only ever reads and writes the `start` cursor;
/// all other fields are passed through unchanged.
pub trait PageParams: Clone + Send + Sync {
    /// The cursor marking the beginning of the requested page
    fn start(&self) -> Option<&str>;

    /// Replace the cursor
    fn set_start(&mut self, start: Option<String>);

    /// Maximum number of items per page, if set
    fn limit(&self) -> Option<u32> {
        None
    }
}

/// The parsed response of a single list call.
///
/// Items are not part of this trait: the pager receives an explicit
/// accessor for them so each collection keeps its own field name and type.
pub trait PageResult: Send {
    /// The cursor for the following page; `None` when this is the last page
    fn next_start(&self) -> Option<&str>;
}

/// Link to the first page of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReference {
    /// URL of the first page
    pub href: String,
}

/// Link to the following page of a collection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NextPageReference {
    /// URL of the next page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Opaque cursor to pass as `start` on the next call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
}

impl NextPageReference {
    /// Create a reference carrying only a cursor
    pub fn with_start(start: impl Into<String>) -> Self {
        Self {
            href: None,
            start: Some(start.into()),
        }
    }

    /// The usable cursor; an empty string counts as no cursor
    pub fn cursor(&self) -> Option<&str> {
        self.start.as_deref().filter(|s| !s.is_empty())
    }
}

/// Resolve the cursor of an optional `next` reference
pub fn next_cursor(next: Option<&NextPageReference>) -> Option<&str> {
    next.and_then(NextPageReference::cursor)
}

/// Generic list parameters: `limit`, `start` and pass-through filters.
///
/// Used by list operations that do not define their own parameter type,
/// such as [`HttpListOperation`](crate::service::HttpListOperation).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    /// Maximum number of items per page
    pub limit: Option<u32>,
    /// Cursor of the requested page
    pub start: Option<String>,
    /// Resource-specific filters, sent as query parameters
    pub filters: BTreeMap<String, String>,
}

impl ListParams {
    /// Create empty list parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Add a filter
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Render as query parameters; `limit` and `start` win over same-named filters
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = self
            .filters
            .iter()
            .filter(|(k, _)| k.as_str() != "limit" && k.as_str() != "start")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(start) = &self.start {
            query.push(("start".to_string(), start.clone()));
        }
        query
    }
}

impl PageParams for ListParams {
    fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    fn set_start(&mut self, start: Option<String>) {
        self.start = start;
    }

    fn limit(&self) -> Option<u32> {
        self.limit
    }
}
