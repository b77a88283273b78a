//! Wire types for the upstream completion API
//!
//! Requests follow the OpenAI chat-completions shape. Responses are decoded
//! into [`UpstreamOutcome`], a tagged union, instead of indexing into raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Role attached to the relayed message
pub const USER_ROLE: &str = "user";

/// Single chat message in an upstream request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamMessage {
    pub role: String,
    pub content: String,
}

/// Body POSTed to the completion endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamRequest {
    pub model: String,
    pub messages: Vec<UpstreamMessage>,
}

impl UpstreamRequest {
    /// Request carrying exactly one user message, content copied verbatim
    pub fn user_message(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![UpstreamMessage {
                role: USER_ROLE.to_string(),
                content: content.into(),
            }],
        }
    }
}

/// What the upstream body meant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamOutcome {
    /// First choice's message content
    Completion { content: String },
    /// Provider's own error payload
    Rejected { message: String },
}

/// Why an upstream body could not be turned into an [`UpstreamOutcome`]
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("response body is not a JSON object")]
    NotAnObject,

    #[error("response carried an error without a string message")]
    ErrorWithoutMessage,

    #[error("response carried neither an error nor choices")]
    MissingChoices,

    #[error("response choices did not have the expected shape: {0}")]
    UnexpectedShape(#[source] serde_json::Error),

    #[error("response contained an empty choices array")]
    EmptyChoices,
}

#[derive(Deserialize)]
struct RawChoice {
    message: RawMessage,
}

#[derive(Deserialize)]
struct RawMessage {
    content: String,
}

impl UpstreamOutcome {
    /// Decode a raw upstream response body
    ///
    /// Any non-null `error` decides the outcome, even when `choices` is
    /// present as well.
    pub fn from_slice(body: &[u8]) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_slice(body).map_err(DecodeError::InvalidJson)?;
        let Value::Object(mut fields) = value else {
            return Err(DecodeError::NotAnObject);
        };

        match fields.remove("error") {
            None | Some(Value::Null) => {}
            Some(error) => {
                return error
                    .get("message")
                    .and_then(Value::as_str)
                    .map(|message| Self::Rejected {
                        message: message.to_string(),
                    })
                    .ok_or(DecodeError::ErrorWithoutMessage);
            }
        }

        let choices = fields
            .remove("choices")
            .ok_or(DecodeError::MissingChoices)?;
        let choices =
            Vec::<RawChoice>::deserialize(choices).map_err(DecodeError::UnexpectedShape)?;

        choices
            .into_iter()
            .next()
            .map(|choice| Self::Completion {
                content: choice.message.content,
            })
            .ok_or(DecodeError::EmptyChoices)
    }
}
