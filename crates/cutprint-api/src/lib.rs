#![warn(missing_docs)]
//! # cutprint-api
//!
//! ## Purpose
//! Client for the photo endpoints of the cutprint backend: album save, photo
//! listing and visibility changes.
//!
//! ## Responsibilities
//! - Enforce HTTPS for the API base URL.
//! - Attach the bearer token supplied by the login collaborator.
//! - Retry transient upload failures with exponential backoff and jitter.
//! - Send a content-derived idempotency key so retried uploads are not
//!   stored twice.
//! - Map HTTP statuses into typed [`ApiError`] values.
//!
//! ## Data flow
//! Composed image bytes -> [`PhotoApi::upload_base64`] -> [`ApiTransport`]
//! -> [`SavedPhoto`] whose `url` becomes the QR payload.
//!
//! ## Ownership and lifetimes
//! The client owns its base URL and token; the transport and sleeper are
//! shared trait objects so tests can substitute in-memory doubles.
//!
//! ## Error model
//! Network failures, timeouts and 5xx/429 responses are retriable; auth and
//! other 4xx failures are permanent. See [`classify_api_error`].
//!
//! ## Security and privacy notes
//! Tokens and image bytes are never logged; only method, path and status are.

mod retry;
mod transport;

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use cutprint_core::{Photo, SavedPhoto, UploadPhotoRequest, Visibility, VisibilityUpdate};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use url::Url;

pub use retry::{
    FailureClass, RetryPolicy, Sleeper, ThreadSleeper, classify_api_error, idempotency_key_for_payload,
};
pub use transport::{ApiRequest, ApiResponse, ApiTransport, IDEMPOTENCY_HEADER, Method, ReqwestTransport};

/// Production API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.cutprint.app";

/// Result of a successful album save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    /// Stored photo; `url` is the final, server-persisted address.
    pub saved: SavedPhoto,
    /// Attempts made, including the successful one.
    pub attempts: u32,
    /// Idempotency key sent with every attempt.
    pub idempotency_key: String,
}

/// Photo endpoint client.
#[derive(Clone)]
pub struct PhotoApi {
    base: String,
    token: Option<String>,
    policy: RetryPolicy,
    transport: Arc<dyn ApiTransport>,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for PhotoApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoApi")
            .field("base", &self.base)
            .field("has_token", &self.token.is_some())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl PhotoApi {
    /// Creates a client for `base`.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidEndpoint`] unless `base` is an HTTPS URL.
    pub fn new(
        base: impl Into<String>,
        policy: RetryPolicy,
        transport: Arc<dyn ApiTransport>,
    ) -> Result<Self, ApiError> {
        let base = base.into();
        validate_api_base(&base)?;
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            token: None,
            policy,
            transport,
            sleeper: Arc::new(ThreadSleeper),
        })
    }

    /// Sets the bearer token used for every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.trim().is_empty()).then_some(token);
        self
    }

    /// Replaces the retry sleeper.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Normalised base URL.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Photos owned by the current user.
    ///
    /// # Errors
    /// Returns [`ApiError`] for transport, status and decode failures.
    pub fn my_photos(&self) -> Result<Vec<Photo>, ApiError> {
        self.get_json("/photos/my-photos")
    }

    /// Photos of another user visible to the current user.
    ///
    /// # Errors
    /// Returns [`ApiError`] for transport, status and decode failures.
    pub fn user_photos(&self, user_id: i64) -> Result<Vec<Photo>, ApiError> {
        self.get_json(&format!("/photos/user/{user_id}"))
    }

    /// Saves an encoded image to the album.
    ///
    /// Transient failures are retried per the [`RetryPolicy`], each attempt
    /// carrying the same idempotency key.
    ///
    /// # Errors
    /// Returns the last [`ApiError`] once retries are exhausted, or the first
    /// permanent one.
    pub fn upload_base64(
        &self,
        image: &[u8],
        visibility: Visibility,
        friend_ids: Option<Vec<i64>>,
    ) -> Result<UploadReport, ApiError> {
        if image.is_empty() {
            return Err(ApiError::InvalidRequest("image is empty".to_string()));
        }

        let idempotency_key = idempotency_key_for_payload(image);
        let body = serde_json::to_value(UploadPhotoRequest {
            image: STANDARD.encode(image),
            friend_ids,
            visibility,
        })
        .map_err(|error| ApiError::InvalidRequest(error.to_string()))?;
        let request = self.request(Method::Post, "/photos/upload-base64", Some(body), Some(idempotency_key.clone()));

        let mut attempts = 0;
        loop {
            attempts += 1;
            let outcome = self
                .execute(&request)
                .and_then(|response| decode::<SavedPhoto>(&response.body));

            match outcome {
                Ok(saved) => {
                    validate_saved_url(&saved)?;
                    log::info!("photo {} saved after {attempts} attempt(s)", saved.id);
                    return Ok(UploadReport {
                        saved,
                        attempts,
                        idempotency_key,
                    });
                }
                Err(error) => {
                    let retries_used = attempts - 1;
                    if classify_api_error(&error) == FailureClass::Permanent
                        || retries_used >= self.policy.max_retries
                    {
                        log::warn!("upload failed after {attempts} attempt(s): {error}");
                        return Err(error);
                    }
                    let delay = self.policy.delay(retries_used);
                    log::warn!("upload attempt {attempts} failed ({error}); retrying in {delay:?}");
                    self.sleeper.sleep(delay);
                }
            }
        }
    }

    /// Changes who can see a photo.
    ///
    /// # Errors
    /// Returns [`ApiError`] for transport and status failures.
    pub fn set_visibility(&self, photo_id: i64, visibility: Visibility) -> Result<(), ApiError> {
        let body = serde_json::to_value(VisibilityUpdate { visibility })
            .map_err(|error| ApiError::InvalidRequest(error.to_string()))?;
        let request = self.request(Method::Post, &format!("/photos/{photo_id}/visibility"), Some(body), None);
        self.execute(&request)?;
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::Get, path, None, None);
        let response = self.execute(&request)?;
        decode(&response.body)
    }

    fn request(&self, method: Method, path: &str, body: Option<Value>, idempotency_key: Option<String>) -> ApiRequest {
        ApiRequest {
            method,
            url: format!("{}{path}", self.base),
            path: path.to_string(),
            bearer_token: self.token.clone(),
            idempotency_key,
            body,
        }
    }

    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let response = self.transport.send(request)?;
        log::debug!("{} {} -> {}", request.method.as_str(), request.path, response.status);
        check_status(response.status)?;
        Ok(response)
    }
}

/// Returns `true` for syntactically valid HTTPS URLs.
pub fn is_https_endpoint(endpoint: &str) -> bool {
    Url::parse(endpoint)
        .map(|url| url.scheme() == "https" && url.host_str().is_some())
        .unwrap_or(false)
}

/// Validates the API base URL.
///
/// # Errors
/// Returns [`ApiError::InvalidEndpoint`] for unparsable or non-HTTPS URLs and
/// for URLs carrying credentials, a query or a fragment.
pub fn validate_api_base(base: &str) -> Result<(), ApiError> {
    let parsed = Url::parse(base).map_err(|error| ApiError::InvalidEndpoint(format!("invalid api url: {error}")))?;
    if parsed.scheme() != "https" || parsed.host_str().is_none() {
        return Err(ApiError::InvalidEndpoint("api base must use https".to_string()));
    }
    if !parsed.username().is_empty() || parsed.password().is_some() {
        return Err(ApiError::InvalidEndpoint("api base must not embed credentials".to_string()));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ApiError::InvalidEndpoint("api base must not carry a query or fragment".to_string()));
    }
    Ok(())
}

fn check_status(status: u16) -> Result<(), ApiError> {
    match status {
        200..=299 => Ok(()),
        401 | 403 => Err(ApiError::Unauthorized(status)),
        408 => Err(ApiError::Timeout),
        429 => Err(ApiError::RateLimited),
        500..=599 => Err(ApiError::Server(status)),
        _ => Err(ApiError::Client(status)),
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|error| ApiError::Decode(error.to_string()))
}

// The saved URL becomes a QR payload, so it must be an absolute web address.
fn validate_saved_url(saved: &SavedPhoto) -> Result<(), ApiError> {
    match Url::parse(&saved.url) {
        Ok(url) if matches!(url.scheme(), "https" | "http") => Ok(()),
        _ => Err(ApiError::InvalidResponse(format!(
            "photo {} returned unusable url",
            saved.id
        ))),
    }
}

/// REST boundary errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Base URL violates the endpoint policy.
    #[error("invalid api endpoint: {0}")]
    InvalidEndpoint(String),
    /// Request could not be built.
    #[error("invalid api request: {0}")]
    InvalidRequest(String),
    /// No response: connection, DNS or TLS failure.
    #[error("network transport failure: {0}")]
    Transport(String),
    /// Request timed out.
    #[error("network request timed out")]
    Timeout,
    /// Token missing, expired or lacking permission.
    #[error("unauthorized (status {0})")]
    Unauthorized(u16),
    /// Server asked the client to slow down.
    #[error("rate limited by server")]
    RateLimited,
    /// Server-side failure.
    #[error("server error (status {0})")]
    Server(u16),
    /// Other client-side rejection.
    #[error("request rejected (status {0})")]
    Client(u16),
    /// Response body did not match the expected shape.
    #[error("response decode failure: {0}")]
    Decode(String),
    /// Response decoded but is unusable.
    #[error("invalid api response: {0}")]
    InvalidResponse(String),
}
