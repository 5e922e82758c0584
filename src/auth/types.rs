//! Auth configuration types
//!
//! Runtime authentication settings, built either in code or by the
//! configuration loader from a YAML file or environment variables.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default IAM endpoint for API-key token exchange
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com";

/// Location for API key placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Place in HTTP header
    #[default]
    Header,
    /// Place in query parameter
    Query,
}

/// Authentication configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    #[serde(alias = "noauth", alias = "no_auth")]
    None,

    /// HTTP Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },

    /// Static bearer token
    #[serde(alias = "bearertoken", alias = "bearer_token")]
    Bearer {
        /// The bearer token
        token: String,
    },

    /// API Key authentication (header or query)
    #[serde(alias = "apikey")]
    ApiKey {
        /// Where to place the API key
        #[serde(default)]
        location: Location,
        /// Header name (for header location)
        #[serde(default)]
        header_name: Option<String>,
        /// Query parameter name (for query location)
        #[serde(default)]
        query_param: Option<String>,
        /// Prefix to add before the value (e.g., "Bearer ")
        #[serde(default)]
        prefix: Option<String>,
        /// The API key value
        value: String,
    },

    /// IAM API-key exchange: the key is traded for a short-lived bearer token
    Iam {
        /// The IAM API key
        apikey: String,
        /// IAM base URL
        #[serde(default = "default_iam_url")]
        url: String,
        /// Optional client ID for the token request
        #[serde(default)]
        client_id: Option<String>,
        /// Optional client secret for the token request
        #[serde(default)]
        client_secret: Option<String>,
        /// Optional scope
        #[serde(default)]
        scope: Option<String>,
    },
}

fn default_iam_url() -> String {
    DEFAULT_IAM_URL.to_string()
}

impl AuthConfig {
    /// IAM authentication against the default endpoint
    pub fn iam(apikey: impl Into<String>) -> Self {
        Self::Iam {
            apikey: apikey.into(),
            url: default_iam_url(),
            client_id: None,
            client_secret: None,
            scope: None,
        }
    }

    /// Name of the authentication scheme
    pub fn auth_type(&self) -> &'static str {
        match self {
            AuthConfig::None => "noAuth",
            AuthConfig::Basic { .. } => "basic",
            AuthConfig::Bearer { .. } => "bearerToken",
            AuthConfig::ApiKey { .. } => "apikey",
            AuthConfig::Iam { .. } => "iam",
        }
    }

    /// Reject configurations with missing credentials
    pub fn validate(&self) -> Result<()> {
        fn require(field: &str, value: &str) -> Result<()> {
            if value.trim().is_empty() {
                Err(Error::missing_field(field))
            } else {
                Ok(())
            }
        }

        match self {
            AuthConfig::None => Ok(()),
            AuthConfig::Basic { username, password } => {
                require("username", username)?;
                require("password", password)?;
                if username.contains(':') {
                    return Err(Error::invalid_value(
                        "username",
                        "must not contain ':'",
                    ));
                }
                Ok(())
            }
            AuthConfig::Bearer { token } => require("bearer_token", token),
            AuthConfig::ApiKey { value, .. } => require("apikey", value),
            AuthConfig::Iam {
                apikey,
                url,
                client_id,
                client_secret,
                ..
            } => {
                require("apikey", apikey)?;
                require("auth_url", url)?;
                if client_id.is_some() != client_secret.is_some() {
                    return Err(Error::invalid_value(
                        "client_id",
                        "client_id and client_secret must be set together",
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false,
        }
    }
}
