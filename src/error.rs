//! Error types for the chat relay
//!
//! All errors implement `IntoResponse` for Axum handlers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::handlers::chat::ChatResponse;

/// Body returned when the chat request carries no usable message
pub const MESSAGE_REQUIRED: &str = "Message is required";

/// Body returned for any transport or decoding failure talking to upstream
pub const UPSTREAM_UNAVAILABLE: &str = "Failed to contact AI service";

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Invalid request: {0}")]
    Validation(String),

    /// The completion provider answered with its own error payload
    #[error("Upstream reported an error: {message}")]
    UpstreamReported { message: String },

    /// Network failure, timeout, or a body that matched neither response shape
    #[error("Upstream unavailable: {reason}")]
    UpstreamUnavailable { reason: String },

    #[error("No upstream credential configured")]
    MissingCredential,
}

impl AppError {
    /// Validation error for a missing or empty chat message
    pub fn message_required() -> Self {
        Self::Validation(MESSAGE_REQUIRED.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::UpstreamReported { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
            // Underlying cause stays in the logs, callers get a fixed message
            Self::UpstreamUnavailable { .. } | Self::MissingCredential => (
                StatusCode::INTERNAL_SERVER_ERROR,
                UPSTREAM_UNAVAILABLE.to_string(),
            ),
            other @ (Self::Config(_)
            | Self::ConfigFileRead { .. }
            | Self::ConfigParseFailed { .. }
            | Self::ConfigValidationFailed { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        };

        (status, Json(ChatResponse::Error(message))).into_response()
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
