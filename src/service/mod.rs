//! Service layer
//!
//! The pieces a generated service client is built from:
//!
//! - [`BaseService`] owns the transport and executes [`ServiceRequest`]s
//! - [`DetailedResponse`] carries status, headers and the parsed body
//! - [`HttpListOperation`] exposes a collection path as a
//!   [`ListOperation`](crate::pagination::ListOperation) for the pager
//! - [`RawPage`] is an untyped page for callers without a response type

mod base;
mod list;
mod request;

pub use base::BaseService;
pub use list::{HttpListOperation, RawPage};
pub use request::{DetailedResponse, ServiceRequest};

#[cfg(test)]
mod tests;
