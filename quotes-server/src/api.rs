//! API request and response types

use quotes_core::{NewQuote, StoreError};
use serde::{Deserialize, Serialize};

/// Body of create and update requests
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteInput {
    /// Quote text
    #[serde(default)]
    pub quote: Option<String>,

    /// Who said it
    #[serde(default)]
    pub author: Option<String>,
}

impl QuoteInput {
    /// Apply the presence checks
    pub fn validate(self) -> Result<NewQuote, StoreError> {
        NewQuote::from_parts(self.quote, self.author)
    }
}

/// Uniform error response body.
///
/// The message is repeated under `error` so clients reading either
/// `message` or `error.message` see the same text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human readable failure text
    pub message: String,

    /// Nested copy of the failure
    pub error: ErrorDetail,
}

/// Nested error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Human readable failure text
    pub message: String,
}

impl ErrorBody {
    /// Build a body carrying `message`
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        ErrorBody {
            error: ErrorDetail {
                message: message.clone(),
            },
            message,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Service status
    pub status: HealthStatus,

    /// Service version
    pub version: String,

    /// Uptime in seconds
    pub uptime_seconds: u64,

    /// Number of stored quotes, when the store was consulted
    pub quote_count: Option<usize>,
}

/// Health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Service is healthy
    Healthy,
    /// Service is unhealthy
    Unhealthy,
}
