//! Authentication module
//!
//! Supports: no auth, Basic, Bearer, API Key and IAM API-key exchange.
//!
//! The `Authenticator` attaches credentials to outgoing requests and caches
//! the IAM access token until shortly before it expires.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, CachedToken, Location, DEFAULT_IAM_URL};
