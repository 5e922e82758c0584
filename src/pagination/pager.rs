//! Cursor pager
//!
//! A single generic pager drives any list operation that follows the
//! `start`/`next.start` cursor protocol, whatever the listed resource is.

use super::types::{PageParams, PageResult};
use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::stream::{self, Stream, TryStreamExt};
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// A list operation: fetches one page for the given parameters.
///
/// Errors are returned as-is; the pager never wraps or retries them.
#[async_trait]
pub trait ListOperation: Send + Sync {
    /// Request parameters, including the `start` cursor
    type Params: PageParams;
    /// Parsed page response
    type Page: PageResult;

    /// Fetch one page
    async fn list(&self, params: &Self::Params) -> Result<Self::Page>;
}

#[async_trait]
impl<O: ListOperation + ?Sized> ListOperation for Arc<O> {
    type Params = O::Params;
    type Page = O::Page;

    async fn list(&self, params: &Self::Params) -> Result<Self::Page> {
        (**self).list(params).await
    }
}

#[async_trait]
impl<O: ListOperation + ?Sized> ListOperation for &O {
    type Params = O::Params;
    type Page = O::Page;

    async fn list(&self, params: &Self::Params) -> Result<Self::Page> {
        (**self).list(params).await
    }
}

/// A list operation backed by an async closure, see [`list_fn`]
pub struct ListFn<F, P, R> {
    f: F,
    _marker: PhantomData<fn(P) -> R>,
}

/// Wrap an async closure taking owned parameters as a [`ListOperation`]
pub fn list_fn<F, Fut, P, R>(f: F) -> ListFn<F, P, R>
where
    F: Fn(P) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R>> + Send,
    P: PageParams,
    R: PageResult,
{
    ListFn {
        f,
        _marker: PhantomData,
    }
}

#[async_trait]
impl<F, Fut, P, R> ListOperation for ListFn<F, P, R>
where
    F: Fn(P) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R>> + Send,
    P: PageParams + 'static,
    R: PageResult + 'static,
{
    type Params = P;
    type Page = R;

    async fn list(&self, params: &P) -> Result<R> {
        (self.f)(params.clone()).await
    }
}

type ItemsFn<P, T> = Box<dyn Fn(P) -> Vec<T> + Send + Sync>;

/// Stateful iterator over a cursor-paginated list operation.
///
/// The pager owns a private copy of the request parameters and advances
/// the `start` cursor itself. Once a response arrives without a next
/// cursor the pager is exhausted for good, and further calls to
/// [`get_next`](Self::get_next) fail with [`Error::ExhaustedIterator`].
///
/// ```rust,ignore
/// let mut pager = Pager::new(op, &ListParams::new().with_limit(50), |page: AppList| page.apps)?;
/// while pager.has_next() {
///     for app in pager.get_next().await? {
///         println!("{}", app.name);
///     }
/// }
/// ```
pub struct Pager<O: ListOperation, T> {
    operation: O,
    params: O::Params,
    items: ItemsFn<O::Page, T>,
    has_more: bool,
    pending_cursor: Option<String>,
    pages_fetched: usize,
}

impl<O: ListOperation, T> Pager<O, T> {
    /// Create a pager over `operation`.
    ///
    /// `items` extracts the listed items from a page. `params` is cloned;
    /// it must not carry a `start` cursor.
    pub fn new<F>(operation: O, params: &O::Params, items: F) -> Result<Self>
    where
        F: Fn(O::Page) -> Vec<T> + Send + Sync + 'static,
    {
        if params.start().is_some_and(|s| !s.is_empty()) {
            return Err(Error::invalid_argument(
                "the 'start' cursor must not be set when creating a pager",
            ));
        }

        let mut params = params.clone();
        params.set_start(None);

        Ok(Self {
            operation,
            params,
            items: Box::new(items),
            has_more: true,
            pending_cursor: None,
            pages_fetched: 0,
        })
    }

    /// Whether another page may be fetched
    pub fn has_next(&self) -> bool {
        self.has_more
    }

    /// Number of pages fetched so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// The parameters the next request will be based on
    pub fn params(&self) -> &O::Params {
        &self.params
    }

    /// Fetch the next page of items.
    ///
    /// The page may be empty even when more pages follow. If the list
    /// operation fails, the pager state is left untouched and the same
    /// page is requested again on the next call.
    pub async fn get_next(&mut self) -> Result<Vec<T>> {
        if !self.has_more {
            return Err(Error::ExhaustedIterator);
        }

        if let Some(cursor) = &self.pending_cursor {
            self.params.set_start(Some(cursor.clone()));
        }

        let page = self.operation.list(&self.params).await?;

        let next = page
            .next_start()
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
        let items = (self.items)(page);
        self.pages_fetched += 1;

        match next {
            Some(cursor) => self.pending_cursor = Some(cursor),
            None => {
                self.pending_cursor = None;
                self.has_more = false;
            }
        }

        debug!(
            "Fetched page {} ({} items, more pages: {})",
            self.pages_fetched,
            items.len(),
            self.has_more
        );

        Ok(items)
    }

    /// Fetch every remaining page and concatenate the items in order.
    ///
    /// Fails on the first failing page; items gathered before the
    /// failure are dropped.
    pub async fn get_all(&mut self) -> Result<Vec<T>> {
        let mut results = Vec::new();
        while self.has_next() {
            let page = self.get_next().await?;
            results.extend(page);
        }
        Ok(results)
    }

    /// Turn the pager into a stream of pages.
    ///
    /// The stream ends after the last page, or right after yielding an error.
    pub fn into_stream(self) -> impl Stream<Item = Result<Vec<T>>> {
        stream::try_unfold(self, |mut pager| async move {
            if !pager.has_next() {
                return Ok(None);
            }
            let page = pager.get_next().await?;
            Ok::<_, Error>(Some((page, pager)))
        })
    }

    /// Turn the pager into a stream of individual items
    pub fn into_item_stream(self) -> impl Stream<Item = Result<T>> {
        self.into_stream()
            .map_ok(|page| stream::iter(page.into_iter().map(Ok::<T, Error>)))
            .try_flatten()
    }

    /// Fetch at most `max_pages` pages, stopping early when exhausted
    pub async fn take_pages(&mut self, max_pages: usize) -> Result<Vec<T>> {
        let mut results = Vec::new();
        let mut taken = 0;
        while self.has_next() && taken < max_pages {
            results.extend(self.get_next().await?);
            taken += 1;
        }
        Ok(results)
    }
}

impl<O, T> fmt::Debug for Pager<O, T>
where
    O: ListOperation,
    O::Params: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pager")
            .field("params", &self.params)
            .field("has_more", &self.has_more)
            .field("pending_cursor", &self.pending_cursor)
            .field("pages_fetched", &self.pages_fetched)
            .finish_non_exhaustive()
    }
}
