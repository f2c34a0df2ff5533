//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache manager, its stores and the sample API.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A required argument was empty or otherwise unusable.
    /// Raised before any store call is made.
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// Payload bytes could not be encoded to or decoded from JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The underlying key-value store failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The store refused a value above its size limit
    #[error("Value for key '{key}' is {size} bytes, exceeding the {limit} byte limit")]
    ValueTooLarge {
        key: String,
        size: usize,
        limit: usize,
    },

    /// The caller cancelled the operation before the store responded
    #[error("Operation cancelled")]
    Cancelled,

    /// Domain entity not found (sample API only; cache misses are not errors)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed HTTP request (sample API only)
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl CacheError {
    /// Shorthand for an `InvalidArgument` error.
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        CacheError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::BadRequest(_) | CacheError::InvalidArgument { .. } => {
                StatusCode::BAD_REQUEST
            }
            CacheError::ValueTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            CacheError::StoreUnavailable(_) | CacheError::Cancelled => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            CacheError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;
