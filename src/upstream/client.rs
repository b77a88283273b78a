//! HTTP client for the upstream completion API
//!
//! One POST per call. No retries; an optional timeout comes from
//! `upstream.timeout_seconds`.

use crate::config::{Credential, UpstreamConfig};
use crate::error::{AppError, AppResult};
use crate::upstream::types::{UpstreamOutcome, UpstreamRequest};
use async_trait::async_trait;

/// Header carrying the referring site for provider-side attribution
pub const REFERER_HEADER: &str = "HTTP-Referer";

/// Header carrying the application name for provider-side attribution
pub const TITLE_HEADER: &str = "X-Title";

/// Something that can turn a user message into a completion
///
/// The `/chat` handler only depends on this trait, so the upstream can be
/// replaced in tests.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Relay `message` and return the reply text
    ///
    /// # Errors
    ///
    /// - [`AppError::UpstreamReported`] when the provider returned an error payload
    /// - [`AppError::UpstreamUnavailable`] on transport or decoding failures
    /// - [`AppError::MissingCredential`] when no credential is configured
    async fn complete(&self, message: &str) -> AppResult<String>;
}

/// `reqwest`-backed [`CompletionService`]
///
/// The inner `reqwest::Client` pools connections and is shared by every request.
pub struct UpstreamClient {
    http: reqwest::Client,
    url: String,
    model: String,
    credential: Option<Credential>,
    referer: Option<String>,
    title: Option<String>,
}

impl UpstreamClient {
    /// Build a client from upstream configuration
    pub fn new(config: &UpstreamConfig) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(|e| {
            AppError::Config(format!("Failed to build upstream HTTP client: {}", e))
        })?;

        tracing::debug!(
            url = %config.url(),
            model = %config.model(),
            timeout = ?config.timeout(),
            credential_configured = config.api_key().is_some(),
            "Upstream client created"
        );

        Ok(Self {
            http,
            url: config.url().to_string(),
            model: config.model().to_string(),
            credential: config.api_key().cloned(),
            referer: config.referer().map(str::to_string),
            title: config.title().map(str::to_string),
        })
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    fn unavailable(reason: impl Into<String>) -> AppError {
        AppError::UpstreamUnavailable {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl CompletionService for UpstreamClient {
    async fn complete(&self, message: &str) -> AppResult<String> {
        let credential = self
            .credential
            .as_ref()
            .filter(|credential| !credential.is_empty())
            .ok_or(AppError::MissingCredential)?;

        let payload = UpstreamRequest::user_message(&self.model, message);

        let mut request = self
            .http
            .post(&self.url)
            .bearer_auth(credential.expose())
            .json(&payload);
        if let Some(referer) = &self.referer {
            request = request.header(REFERER_HEADER, referer);
        }
        if let Some(title) = &self.title {
            request = request.header(TITLE_HEADER, title);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Self::unavailable(format!("request timed out: {}", e))
            } else {
                Self::unavailable(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::unavailable(format!("failed to read response body: {}", e)))?;

        tracing::debug!(
            upstream_status = status.as_u16(),
            body_length = body.len(),
            "Upstream responded"
        );

        // The body decides the outcome; the HTTP status is only diagnostic
        match UpstreamOutcome::from_slice(&body) {
            Ok(UpstreamOutcome::Completion { content }) => Ok(content),
            Ok(UpstreamOutcome::Rejected { message }) => {
                Err(AppError::UpstreamReported { message })
            }
            Err(e) => Err(Self::unavailable(format!(
                "HTTP {}: {}",
                status.as_u16(),
                e
            ))),
        }
    }
}
