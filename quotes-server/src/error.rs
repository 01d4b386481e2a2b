//! Error types for the HTTP API
//!
//! Every failure a handler can produce is an [`ApiError`], and every
//! [`ApiError`] becomes a response through the one `IntoResponse` impl
//! below: the variant picks the status, the body is always [`ErrorBody`].

use crate::api::ErrorBody;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quotes_core::StoreError;
use std::fmt;
use tracing::{debug, error};

/// API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Not found (404)
    NotFound(String),

    /// Service unavailable (503)
    ServiceUnavailable(String),

    /// Record store error
    Store(StoreError),
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP status this error answers with
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::InvalidQuote(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text sent to the client
    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::ServiceUnavailable(msg) => msg.clone(),
            ApiError::Store(e) => e.to_string(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
            ApiError::Store(_) => "store_error",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::Store(e) => write!(f, "Store error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("Request failed with {}: {}", status.as_u16(), self);
        } else {
            debug!("Request rejected with {}: {}", status.as_u16(), self);
        }
        crate::metrics::record_error(self.kind());

        // Same body shape for every variant
        (status, Json(ErrorBody::new(self.message()))).into_response()
    }
}
