// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Cloud SDK Core
//!
//! Shared runtime for generated cloud service clients: configuration,
//! authentication, an HTTP transport, and a generic cursor pager for
//! paginated list operations.
//!
//! ## Features
//!
//! - **Cursor Pagination**: one [`Pager`] for every collection that follows
//!   the `start` / `next.start` convention
//! - **Auth**: IAM API-key exchange, bearer token, basic, API key
//! - **Transport**: path templates, default headers, opt-in retries
//! - **Config**: YAML files or `<SERVICE>_*` environment variables
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cloud_sdk_core::{BaseService, HttpListOperation, ListParams, Pager, RawPage, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let service = Arc::new(BaseService::from_env("resource-controller")?);
//!     let op = HttpListOperation::<RawPage>::new(service, "/v2/resource_instances");
//!
//!     let mut pager = Pager::new(op, &ListParams::new().with_limit(50), RawPage::items_at("resources"))?;
//!     while pager.has_next() {
//!         for item in pager.get_next().await? {
//!             println!("{item}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │        Pager<O: ListOperation, T>  has_next / get_next      │
//! │                  get_all / into_stream                      │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//! ┌───────────────┬─────────────┴─────────┬─────────────────────┐
//! │    Service    │        HTTP           │        Auth         │
//! ├───────────────┼───────────────────────┼─────────────────────┤
//! │ BaseService   │ Path templates        │ IAM                 │
//! │ ServiceRequest│ Retry / Backoff       │ Bearer / Basic      │
//! │ HttpListOp    │ Default headers       │ API key             │
//! └───────────────┴───────────────────────┴─────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the SDK core
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication implementations
pub mod auth;

/// HTTP client with retries
pub mod http;

/// Cursor pagination
pub mod pagination;

/// Base service and request descriptors
pub mod service;

/// Service configuration
pub mod config;

/// Path template rendering
pub mod template;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::{AuthConfig, Authenticator};
pub use config::ServiceConfig;
pub use pagination::{
    list_fn, next_cursor, ListOperation, ListParams, NextPageReference, PageParams,
    PageReference, PageResult, Pager,
};
pub use service::{BaseService, DetailedResponse, HttpListOperation, RawPage, ServiceRequest};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
