//! Liveness endpoint
//!
//! Used by process supervisors as a health probe. Never touches upstream.

use axum::http::StatusCode;

/// Body returned by `GET /`
pub const LIVENESS_MESSAGE: &str = "Chat relay server is running";

/// GET / handler
pub async fn handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, LIVENESS_MESSAGE)
}
