//! Request and response descriptors for service calls

use crate::error::{Error, Result};
use crate::http::RequestConfig;
use crate::types::{JsonValue, Method, StringMap};
use reqwest::header::HeaderMap;
use serde::Serialize;

/// Description of a single service operation call.
///
/// Built by operation methods from their typed options, then handed to
/// [`BaseService::execute`](super::BaseService::execute).
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRequest {
    /// HTTP method
    pub method: Method,
    /// Path template relative to the service URL, e.g. `/v2/apps/{app_id}`
    pub path: String,
    /// Values for the template placeholders
    pub path_params: StringMap,
    /// Query parameters in insertion order
    pub query: Vec<(String, String)>,
    /// Per-request headers
    pub headers: StringMap,
    /// JSON body
    pub body: Option<JsonValue>,
}

impl ServiceRequest {
    /// Create a request for `method` on `path`
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            path_params: StringMap::new(),
            query: Vec::new(),
            headers: StringMap::new(),
            body: None,
        }
    }

    /// GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// PATCH request
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Set a path parameter
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Add a query parameter when a value is present
    #[must_use]
    pub fn query_opt<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(name, v.to_string()),
            None => self,
        }
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Serialize `body` as the JSON request body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Fail with `InvalidArgument` when a required option is empty
    pub fn required(name: &str, value: &str) -> Result<()> {
        if value.is_empty() {
            return Err(Error::invalid_argument(format!("{name} cannot be empty")));
        }
        Ok(())
    }

    /// Split into the method, path and transport settings
    pub(crate) fn into_parts(self, default_headers: &StringMap) -> (reqwest::Method, String, RequestConfig) {
        let mut headers = default_headers.clone();
        headers.extend(self.headers);

        let config = RequestConfig {
            path_params: self.path_params,
            query: self.query,
            headers,
            body: self.body,
            ..RequestConfig::default()
        };

        (self.method.into(), self.path, config)
    }
}

/// Result of a service call: the status, the headers and the parsed body
#[derive(Debug, Clone)]
pub struct DetailedResponse<T> {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed response body
    pub result: T,
}

impl<T> DetailedResponse<T> {
    /// A response header as a string, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Consume the response, keeping only the body
    pub fn into_result(self) -> T {
        self.result
    }
}
