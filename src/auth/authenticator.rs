//! Authenticator implementation
//!
//! Attaches credentials to outgoing requests. IAM API keys are traded for
//! an access token at the identity endpoint; the token is cached until it
//! is about to expire.

use super::types::{AuthConfig, CachedToken, Location};
use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";
const IAM_RESPONSE_TYPE: &str = "cloud_iam";

/// Applies one authentication scheme to HTTP requests
pub struct Authenticator {
    config: AuthConfig,
    token: Arc<RwLock<Option<CachedToken>>>,
    client: Client,
}

impl Authenticator {
    /// Create an authenticator with its own HTTP client for token requests
    pub fn new(config: AuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Create an authenticator that sends token requests through `client`
    pub fn with_client(config: AuthConfig, client: Client) -> Self {
        Self {
            config,
            token: Arc::new(RwLock::new(None)),
            client,
        }
    }

    /// Attach credentials to `req`
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let req = match &self.config {
            AuthConfig::None => req,
            AuthConfig::Basic { username, password } => req.basic_auth(username, Some(password)),
            AuthConfig::Bearer { token } => req.bearer_auth(token),
            AuthConfig::ApiKey {
                location: Location::Header,
                header_name,
                prefix,
                value,
                ..
            } => req.header(
                header_name.as_deref().unwrap_or("Authorization"),
                prefixed(prefix.as_deref(), value),
            ),
            AuthConfig::ApiKey {
                location: Location::Query,
                query_param,
                prefix,
                value,
                ..
            } => req.query(&[(
                query_param.as_deref().unwrap_or("apikey"),
                prefixed(prefix.as_deref(), value),
            )]),
            AuthConfig::Iam { .. } => req.bearer_auth(self.access_token().await?),
        };
        Ok(req)
    }

    /// A valid IAM access token, requesting a new one when the cached token expired
    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.as_ref().filter(|t| !t.is_expired()) {
            return Ok(token.token.clone());
        }

        let mut slot = self.token.write().await;
        // another task may have refreshed while we waited for the write lock
        if let Some(token) = slot.as_ref().filter(|t| !t.is_expired()) {
            return Ok(token.token.clone());
        }

        let fresh = self.request_iam_token().await?;
        let access_token = fresh.token.clone();
        *slot = Some(fresh);
        Ok(access_token)
    }

    async fn request_iam_token(&self) -> Result<CachedToken> {
        let AuthConfig::Iam {
            apikey,
            url,
            client_id,
            client_secret,
            scope,
        } = &self.config
        else {
            return Err(Error::auth("only IAM authentication exchanges tokens"));
        };

        let endpoint = format!("{}/identity/token", url.trim_end_matches('/'));
        let mut form = vec![
            ("grant_type", IAM_GRANT_TYPE),
            ("apikey", apikey.as_str()),
            ("response_type", IAM_RESPONSE_TYPE),
        ];
        if let Some(scope) = scope {
            form.push(("scope", scope.as_str()));
        }

        let mut req = self
            .client
            .post(&endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form);
        if let (Some(id), Some(secret)) = (client_id, client_secret) {
            req = req.basic_auth(id, Some(secret));
        }

        debug!("Requesting IAM token from {}", endpoint);
        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenRefresh {
                message: format!("IAM token request failed with status {}: {body}", status.as_u16()),
            });
        }

        let body: IamTokenResponse = response.json().await?;
        Ok(body.into())
    }

    /// Forget the cached token; the next IAM request fetches a new one
    pub async fn clear_cache(&self) {
        self.token.write().await.take();
    }

    /// The authentication settings
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("auth_type", &self.config.auth_type())
            .finish_non_exhaustive()
    }
}

fn prefixed(prefix: Option<&str>, value: &str) -> String {
    format!("{}{value}", prefix.unwrap_or_default())
}

/// Body of a successful IAM token response
#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
    /// Lifetime in seconds
    #[serde(default)]
    expires_in: Option<i64>,
    /// Absolute expiry in epoch seconds
    #[serde(default)]
    expiration: Option<i64>,
}

impl From<IamTokenResponse> for CachedToken {
    fn from(body: IamTokenResponse) -> Self {
        match (body.expires_in, body.expiration) {
            (Some(secs), _) => CachedToken::expires_in(body.access_token, secs),
            (None, epoch) => CachedToken::new(
                body.access_token,
                epoch.and_then(|e| chrono::DateTime::from_timestamp(e, 0)),
            ),
        }
    }
}
