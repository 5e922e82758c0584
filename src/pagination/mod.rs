//! Pagination module
//!
//! Cursor-based paging over list operations.
//!
//! # Overview
//!
//! A list operation returns one page of items plus an optional `next`
//! reference whose `start` cursor requests the following page. The
//! [`Pager`] hides that bookkeeping behind `has_next`/`get_next`/`get_all`
//! and works for every collection: it is generic over the item type and
//! takes an explicit accessor that pulls the items out of a page.

mod pager;
mod types;

pub use pager::{list_fn, ListFn, ListOperation, Pager};
pub use types::{
    next_cursor, ListParams, NextPageReference, PageParams, PageReference, PageResult,
};
