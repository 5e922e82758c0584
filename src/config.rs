//! Service configuration
//!
//! A [`ServiceConfig`] describes how to reach one service: its URL, the
//! credentials to present, and the transport settings. It can be written
//! in YAML or read from environment variables named after the service.
//!
//! ```yaml
//! service_url: https://resource-controller.cloud.ibm.com
//! auth:
//!   type: iam
//!   apikey: my-apikey
//! max_retries: 3
//! ```

use crate::auth::{AuthConfig, Location, DEFAULT_IAM_URL};
use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Connection settings for a single service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the service
    #[serde(default)]
    pub service_url: String,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum retries for transient failures (0 disables retries)
    #[serde(default)]
    pub max_retries: u32,

    /// Initial delay between retries in milliseconds
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,

    /// Upper bound on the delay between retries in milliseconds
    #[serde(default = "default_max_retry_interval_ms")]
    pub max_retry_interval_ms: u64,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_timeout() -> u64 {
    30
}

fn default_retry_interval_ms() -> u64 {
    1000
}

fn default_max_retry_interval_ms() -> u64 {
    30_000
}

impl ServiceConfig {
    /// Config for `service_url` with no authentication and default transport
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            auth: AuthConfig::None,
            timeout_seconds: default_timeout(),
            max_retries: 0,
            retry_interval_ms: default_retry_interval_ms(),
            max_retry_interval_ms: default_max_retry_interval_ms(),
            headers: HashMap::new(),
        }
    }

    /// Set the authentication configuration
    #[must_use]
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        debug!("Loading service config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Read the config from process environment variables
    ///
    /// See [`ServiceConfig::from_lookup`] for the variable names.
    pub fn from_env(service_name: &str) -> Result<Self> {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// Read the config through `lookup`, which resolves variable names.
    ///
    /// Variables are prefixed with the service name upper-cased, `-`
    /// replaced by `_`:
    ///
    /// | Variable | Meaning |
    /// |---|---|
    /// | `<NAME>_URL` | service URL (required) |
    /// | `<NAME>_AUTH_TYPE` | `noauth`, `basic`, `bearertoken`, `iam` or `apikey` |
    /// | `<NAME>_APIKEY` | API key for `iam` and `apikey` |
    /// | `<NAME>_AUTH_URL` | IAM endpoint |
    /// | `<NAME>_CLIENT_ID`, `<NAME>_CLIENT_SECRET`, `<NAME>_SCOPE` | IAM token request options |
    /// | `<NAME>_BEARER_TOKEN` | token for `bearertoken` |
    /// | `<NAME>_USERNAME`, `<NAME>_PASSWORD` | credentials for `basic` |
    /// | `<NAME>_MAX_RETRIES` | retry count |
    /// | `<NAME>_RETRY_INTERVAL` | maximum retry delay in seconds |
    /// | `<NAME>_TIMEOUT` | request timeout in seconds |
    ///
    /// With no `AUTH_TYPE`, an `APIKEY` selects `iam`; otherwise no auth.
    pub fn from_lookup<F>(service_name: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = env_prefix(service_name);
        let var = |suffix: &str| {
            lookup(&format!("{prefix}_{suffix}")).filter(|v| !v.trim().is_empty())
        };
        let require = |suffix: &str| {
            var(suffix).ok_or_else(|| Error::missing_field(format!("{prefix}_{suffix}")))
        };

        let service_url = require("URL")?;

        let auth_type = var("AUTH_TYPE").map(|t| t.to_ascii_lowercase());
        let auth = match auth_type.as_deref() {
            None if var("APIKEY").is_some() => iam_from(&var, require("APIKEY")?),
            None | Some("noauth") => AuthConfig::None,
            Some("iam") => iam_from(&var, require("APIKEY")?),
            Some("apikey") => AuthConfig::ApiKey {
                location: Location::Header,
                header_name: None,
                query_param: None,
                prefix: None,
                value: require("APIKEY")?,
            },
            Some("bearertoken") => AuthConfig::Bearer {
                token: require("BEARER_TOKEN")?,
            },
            Some("basic") => AuthConfig::Basic {
                username: require("USERNAME")?,
                password: require("PASSWORD")?,
            },
            Some(other) => {
                return Err(Error::invalid_value(
                    format!("{prefix}_AUTH_TYPE"),
                    format!("unsupported authentication type '{other}'"),
                ))
            }
        };

        let mut config = Self::new(service_url).with_auth(auth);

        if let Some(raw) = var("MAX_RETRIES") {
            config.max_retries = parse_number(&format!("{prefix}_MAX_RETRIES"), &raw)?;
        }
        if let Some(raw) = var("RETRY_INTERVAL") {
            let secs: u64 = parse_number(&format!("{prefix}_RETRY_INTERVAL"), &raw)?;
            config.max_retry_interval_ms = secs.saturating_mul(1000);
            config.retry_interval_ms = config.retry_interval_ms.min(config.max_retry_interval_ms);
        }
        if let Some(raw) = var("TIMEOUT") {
            config.timeout_seconds = parse_number(&format!("{prefix}_TIMEOUT"), &raw)?;
        }

        config.validate()?;
        debug!(
            "Loaded {} config from environment ({} auth)",
            prefix,
            config.auth.auth_type()
        );
        Ok(config)
    }

    /// Reject configurations that cannot produce a working client
    pub fn validate(&self) -> Result<()> {
        if self.service_url.trim().is_empty() {
            return Err(Error::missing_field("service_url"));
        }
        url::Url::parse(&self.service_url)
            .map_err(|e| Error::invalid_value("service_url", e.to_string()))?;

        if self.timeout_seconds == 0 {
            return Err(Error::invalid_value(
                "timeout_seconds",
                "must be greater than zero",
            ));
        }
        if self.retry_interval_ms > self.max_retry_interval_ms {
            return Err(Error::invalid_value(
                "retry_interval_ms",
                "must not exceed max_retry_interval_ms",
            ));
        }

        self.auth.validate()
    }

    /// Transport settings derived from this config
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.service_url.trim_end_matches('/'))
            .timeout(Duration::from_secs(self.timeout_seconds))
            .max_retries(self.max_retries)
            .backoff(
                BackoffType::Exponential,
                Duration::from_millis(self.retry_interval_ms),
                Duration::from_millis(self.max_retry_interval_ms),
            );

        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }
}

/// Environment variable prefix for a service name
fn env_prefix(service_name: &str) -> String {
    service_name.to_ascii_uppercase().replace('-', "_")
}

fn iam_from(var: &impl Fn(&str) -> Option<String>, apikey: String) -> AuthConfig {
    AuthConfig::Iam {
        apikey,
        url: var("AUTH_URL").unwrap_or_else(|| DEFAULT_IAM_URL.to_string()),
        client_id: var("CLIENT_ID"),
        client_secret: var("CLIENT_SECRET"),
        scope: var("SCOPE"),
    }
}

fn parse_number<N: std::str::FromStr>(field: &str, raw: &str) -> Result<N> {
    raw.trim()
        .parse()
        .map_err(|_| Error::invalid_value(field, format!("'{raw}' is not a valid number")))
}
