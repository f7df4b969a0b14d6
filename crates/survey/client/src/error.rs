//! Client error types

use thiserror::Error;

/// Transport-level errors from the remote survey service
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API error response
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the response body
        message: String,
    },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// No bearer token; login has not happened yet
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for remote-service operations
pub type ApiResult<T> = Result<T, ApiError>;
