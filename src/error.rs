//! Error types for the Q&A pipeline

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Q&A pipeline errors
///
/// A request deadline overrun is deliberately not represented here: it is a
/// normal terminal outcome (`QueryOutcome::timeout`), not an error.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document could not be fetched or read
    #[error("Failed to fetch document '{document}': {message}")]
    Fetch { document: String, message: String },

    /// Document produced zero passages after chunking
    #[error("No text found in document '{0}'")]
    EmptyDocument(String),

    /// Embedding capability failure
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Generation capability failure
    #[error("Answer generation failed: {0}")]
    Generation(String),

    /// Missing or invalid API key
    #[error("Invalid API key")]
    Unauthorized,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a fetch error
    pub fn fetch(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            document: source.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Client-facing rejections keep their message; everything else is
        // logged server-side and surfaced as a generic failure.
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::Fetch { document, message } => (
                StatusCode::BAD_REQUEST,
                "fetch_error",
                format!("Failed to fetch document '{}': {}", document, message),
            ),
            Error::EmptyDocument(source) => (
                StatusCode::BAD_REQUEST,
                "empty_document",
                format!("No text found in document '{}'", source),
            ),
            Error::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Invalid API key".to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Embedding(_)
            | Error::Generation(_)
            | Error::Io(_)
            | Error::Http(_)
            | Error::Internal(_) => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
