//! List operations over HTTP

use super::base::BaseService;
use super::request::ServiceRequest;
use crate::error::Result;
use crate::pagination::{ListOperation, ListParams, PageResult};
use crate::types::{JsonObject, JsonValue, StringMap};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A list operation that GETs a collection path on a [`BaseService`].
///
/// [`ListParams`] become the query string and the body is parsed as `P`.
pub struct HttpListOperation<P> {
    service: Arc<BaseService>,
    path: String,
    path_params: StringMap,
    _page: PhantomData<fn() -> P>,
}

impl<P> HttpListOperation<P> {
    /// List the collection at `path` (a path template)
    pub fn new(service: Arc<BaseService>, path: impl Into<String>) -> Self {
        Self {
            service,
            path: path.into(),
            path_params: StringMap::new(),
            _page: PhantomData,
        }
    }

    /// Set a path parameter of the collection path
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// The collection path template
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<P> fmt::Debug for HttpListOperation<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpListOperation")
            .field("path", &self.path)
            .field("path_params", &self.path_params)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<P> ListOperation for HttpListOperation<P>
where
    P: PageResult + DeserializeOwned + 'static,
{
    type Params = ListParams;
    type Page = P;

    async fn list(&self, params: &ListParams) -> Result<P> {
        let mut request = ServiceRequest::get(self.path.as_str());
        for (name, value) in &self.path_params {
            request = request.path_param(name.as_str(), value.as_str());
        }
        for (name, value) in params.to_query() {
            request = request.query(name, value);
        }

        let response = self.service.execute::<P>(request).await?;
        Ok(response.result)
    }
}

/// An untyped page: the JSON object returned by a list call.
///
/// The cursor is read from `next.start`; the items live under a
/// collection-specific key, see [`RawPage::items_at`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPage(pub JsonObject);

impl RawPage {
    /// Remove and return the array under `key`; anything else yields no items
    pub fn take_items(&mut self, key: &str) -> Vec<JsonValue> {
        match self.0.remove(key) {
            Some(JsonValue::Array(items)) => items,
            _ => Vec::new(),
        }
    }

    /// Item accessor for a [`Pager`](crate::pagination::Pager) over raw pages
    pub fn items_at(key: impl Into<String>) -> impl Fn(RawPage) -> Vec<JsonValue> + Send + Sync + 'static {
        let key = key.into();
        move |mut page: RawPage| page.take_items(&key)
    }
}

impl PageResult for RawPage {
    fn next_start(&self) -> Option<&str> {
        self.0
            .get("next")
            .and_then(|next| next.get("start"))
            .and_then(JsonValue::as_str)
            .filter(|s| !s.is_empty())
    }
}
