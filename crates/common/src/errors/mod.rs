//! Error types for AuthorMaps
//!
//! Provides a single error taxonomy with:
//! - Distinct error types for every way a co-author lookup can fail
//! - HTTP status code mapping
//! - Structured error responses
//! - Error codes for client handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Query errors (1xxx)
    InvalidInput,
    InvalidFormat,
    UnsupportedImageFormat,

    // Lookup outcomes (4xxx)
    AuthorNotFound,
    NoPublicationsFound,
    TooManyPublications,
    MissingField,

    // Remote service errors (8xxx)
    BadRequest,
    UpstreamError,
    CacheError,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Query (1xxx)
            ErrorCode::InvalidInput => 1001,
            ErrorCode::InvalidFormat => 1002,
            ErrorCode::UnsupportedImageFormat => 1003,

            // Lookup (4xxx)
            ErrorCode::AuthorNotFound => 4001,
            ErrorCode::NoPublicationsFound => 4002,
            ErrorCode::TooManyPublications => 4003,
            ErrorCode::MissingField => 4004,

            // Remote (8xxx)
            ErrorCode::BadRequest => 8001,
            ErrorCode::UpstreamError => 8002,
            ErrorCode::CacheError => 8003,

            // Internal (9xxx)
            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Query errors
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Unsupported image format '{extension}', expected one of: {accepted}")]
    UnsupportedImageFormat { extension: String, accepted: String },

    // Lookup outcomes
    #[error("Author not found: {name}")]
    AuthorNotFound { name: String, similar: Vec<String> },

    #[error("No publications found for {name}")]
    NoPublicationsFound { name: String },

    #[error("Too many publications for {name}: {count} exceeds limit of {limit}, please refine the search")]
    TooManyPublications {
        name: String,
        count: usize,
        limit: usize,
    },

    #[error("Publication {pmid} has no {field} field")]
    MissingField { pmid: String, field: String },

    // Remote service errors
    #[error("Bad request for {query}")]
    BadRequest { query: String },

    #[error("PubMed returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Cache error: {message}")]
    Cache { message: String },

    // Internal errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidInput { .. } => ErrorCode::InvalidInput,
            AppError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            AppError::UnsupportedImageFormat { .. } => ErrorCode::UnsupportedImageFormat,
            AppError::AuthorNotFound { .. } => ErrorCode::AuthorNotFound,
            AppError::NoPublicationsFound { .. } => ErrorCode::NoPublicationsFound,
            AppError::TooManyPublications { .. } => ErrorCode::TooManyPublications,
            AppError::MissingField { .. } => ErrorCode::MissingField,
            AppError::BadRequest { .. } => ErrorCode::BadRequest,
            AppError::Upstream { .. } | AppError::HttpClient(_) => ErrorCode::UpstreamError,
            AppError::Cache { .. } => ErrorCode::CacheError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Io(_) => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::InvalidInput { .. } |
            AppError::UnsupportedImageFormat { .. } => StatusCode::BAD_REQUEST,

            // 404 Not Found
            AppError::AuthorNotFound { .. } |
            AppError::NoPublicationsFound { .. } => StatusCode::NOT_FOUND,

            // 422 Unprocessable Entity
            AppError::TooManyPublications { .. } => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            AppError::Configuration { .. } |
            AppError::Serialization(_) |
            AppError::Io(_) |
            AppError::Cache { .. } => StatusCode::INTERNAL_SERVER_ERROR,

            // 502 Bad Gateway
            AppError::InvalidFormat { .. } |
            AppError::MissingField { .. } |
            AppError::BadRequest { .. } |
            AppError::Upstream { .. } |
            AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Extra payload carried by some variants
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::AuthorNotFound { similar, .. } if !similar.is_empty() => {
                Some(serde_json::json!({ "similar_authors": similar }))
            }
            AppError::TooManyPublications { count, limit, .. } => {
                Some(serde_json::json!({ "count": count, "limit": limit }))
            }
            _ => None,
        }
    }
}

/// Structured error response for API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }

        let body = ErrorResponse {
            error: ErrorDetails {
                code,
                message,
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}
