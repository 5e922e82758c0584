//! HTTP client module
//!
//! The transport layer under every service call.
//!
//! # Features
//!
//! - **Path Templates**: `{name}` placeholders filled from path parameters
//! - **Authentication**: Integration with the auth module
//! - **Retries**: Optional, with constant, linear or exponential backoff

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
