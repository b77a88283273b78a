//! Chat endpoint handler
//!
//! Handles POST /chat: validates the message, relays it upstream and
//! unwraps the reply.

use crate::error::{AppError, AppResult, MESSAGE_REQUIRED};
use crate::handlers::AppState;
use crate::middleware::RequestId;
use axum::{Extension, Json, extract::State, extract::rejection::JsonRejection};
use serde::{Deserialize, Deserializer, Serialize};

/// Chat request from client
///
/// Validation is enforced during deserialization - a `ChatRequest` always
/// holds a non-empty message. Fields other than `message` are ignored.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    message: String,
}

impl ChatRequest {
    /// Get the message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl<'de> Deserialize<'de> for ChatRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // The body must be a JSON object; arrays are never read positionally
        let mut fields = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;

        // Whitespace-only messages are forwarded as-is; only absent/empty is rejected
        match fields.remove("message") {
            Some(serde_json::Value::String(message)) if !message.is_empty() => {
                Ok(ChatRequest { message })
            }
            _ => Err(serde::de::Error::custom(MESSAGE_REQUIRED)),
        }
    }
}

/// Chat response to client
///
/// Serializes as `{"reply": ...}` or `{"error": ...}`; the enum makes it
/// impossible to carry both or neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatResponse {
    Reply(String),
    Error(String),
}

/// POST /chat handler
///
/// Makes exactly one upstream call per accepted request and none for
/// rejected ones. The upstream call is the only await point.
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(
                request_id = %request_id,
                rejection = %rejection.body_text(),
                "Rejected chat request without a usable message"
            );
            return Err(AppError::message_required());
        }
    };

    tracing::debug!(
        request_id = %request_id,
        message_length = request.message().len(),
        "Received chat request"
    );

    let started = std::time::Instant::now();
    let result = state.completions().complete(request.message()).await;
    let upstream_duration_ms = started.elapsed().as_secs_f64() * 1000.0;

    match result {
        Ok(reply) => {
            tracing::info!(
                request_id = %request_id,
                reply_length = reply.len(),
                upstream_duration_ms = %upstream_duration_ms,
                "Chat request completed"
            );
            Ok(Json(ChatResponse::Reply(reply)))
        }
        Err(e @ AppError::UpstreamReported { .. }) => {
            tracing::warn!(
                request_id = %request_id,
                error = %e,
                upstream_duration_ms = %upstream_duration_ms,
                "Upstream rejected chat request"
            );
            Err(e)
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                error = %e,
                upstream_duration_ms = %upstream_duration_ms,
                "Failed to contact upstream"
            );
            Err(e)
        }
    }
}
