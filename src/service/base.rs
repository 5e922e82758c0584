//! Base service: the shared plumbing behind every generated service client

use super::request::{DetailedResponse, ServiceRequest};
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::types::StringMap;
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Holds the transport, service URL and default headers of a service.
///
/// Generated clients wrap a `BaseService` and express each operation as a
/// [`ServiceRequest`].
#[derive(Debug)]
pub struct BaseService {
    client: HttpClient,
    service_url: String,
    default_headers: StringMap,
}

impl BaseService {
    /// Build a service from a validated config
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let client = HttpClient::with_auth(config.http_client_config(), config.auth.clone())?;
        Ok(Self {
            client,
            service_url: config.service_url.trim_end_matches('/').to_string(),
            default_headers: StringMap::new(),
        })
    }

    /// Build a service from `<NAME>_*` environment variables
    pub fn from_env(service_name: &str) -> Result<Self> {
        Self::new(&ServiceConfig::from_env(service_name)?)
    }

    /// The service URL, without a trailing slash
    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Point the service at another URL
    pub fn set_service_url(&mut self, url: impl Into<String>) -> Result<()> {
        let url = url.into();
        let url = url.trim_end_matches('/');
        if url.is_empty() {
            return Err(Error::invalid_argument("service URL cannot be empty"));
        }
        url::Url::parse(url)?;

        self.client.set_base_url(url);
        self.service_url = url.to_string();
        Ok(())
    }

    /// Add a header sent with every request of this service
    pub fn set_default_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.default_headers.insert(name.into(), value.into());
    }

    /// Headers sent with every request of this service
    pub fn default_headers(&self) -> &StringMap {
        &self.default_headers
    }

    /// The underlying transport
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Send `request` and parse the JSON body as `T`
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: ServiceRequest,
    ) -> Result<DetailedResponse<T>> {
        let response = self.send(request).await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let result = response.json::<T>().await.map_err(Error::Http)?;

        Ok(DetailedResponse {
            status,
            headers,
            result,
        })
    }

    /// Send `request`, discarding any response body
    pub async fn execute_empty(&self, request: ServiceRequest) -> Result<DetailedResponse<()>> {
        let response = self.send(request).await?;
        Ok(DetailedResponse {
            status: response.status().as_u16(),
            headers: response.headers().clone(),
            result: (),
        })
    }

    async fn send(&self, request: ServiceRequest) -> Result<Response> {
        let (method, path, config) = request.into_parts(&self.default_headers);
        debug!("{} {}{}", method, self.service_url, path);
        self.client.request(method, &path, config).await
    }
}
