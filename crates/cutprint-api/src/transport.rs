//! HTTP transport seam.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::ApiError;

/// Header carrying the upload idempotency key.
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// HTTP method used by the photo endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`.
    Get,
    /// `POST`.
    Post,
}

impl Method {
    /// Upper-case method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Fully resolved request handed to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Method.
    pub method: Method,
    /// Absolute HTTPS URL.
    pub url: String,
    /// Path relative to the API base, for logging.
    pub path: String,
    /// Bearer token, if the user is logged in.
    pub bearer_token: Option<String>,
    /// Idempotency key for non-idempotent writes.
    pub idempotency_key: Option<String>,
    /// JSON body.
    pub body: Option<Value>,
}

/// Raw response returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

/// Executes HTTP requests.
pub trait ApiTransport: Send + Sync {
    /// Sends `request` and returns the raw response for any status code.
    ///
    /// # Errors
    /// Returns [`ApiError::Transport`] or [`ApiError::Timeout`] when no
    /// response was received.
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Blocking `reqwest` transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a client with the given request timeout.
    ///
    /// # Errors
    /// Returns [`ApiError::Transport`] when the TLS backend cannot initialise.
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ApiError::Transport(error.to_string()))?;
        Ok(Self { client })
    }
}

impl ApiTransport for ReqwestTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(key) = &request.idempotency_key {
            builder = builder.header(IDEMPOTENCY_HEADER, key);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(map_reqwest_error)?;
        Ok(ApiResponse { status, body })
    }
}

fn map_reqwest_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout
    } else {
        // Drop the URL so query strings never reach logs.
        ApiError::Transport(error.without_url().to_string())
    }
}
