//! HTTP request handlers for the chat relay

use crate::config::Config;
use crate::error::AppResult;
use crate::middleware::request_id_middleware;
use crate::upstream::{CompletionService, UpstreamClient};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod chat;
pub mod health;

/// Application state shared across all handlers
///
/// Read-only after construction. All fields are Arc'd for cheap cloning
/// across Axum handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    completions: Arc<dyn CompletionService>,
}

impl AppState {
    /// Create a new AppState backed by the real upstream client
    pub fn new(config: Arc<Config>) -> AppResult<Self> {
        let client = UpstreamClient::new(&config.upstream)?;
        Ok(Self::with_service(config, Arc::new(client)))
    }

    /// Create a new AppState with an explicit completion service
    pub fn with_service(config: Arc<Config>, completions: Arc<dyn CompletionService>) -> Self {
        Self {
            config,
            completions,
        }
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the completion service
    pub fn completions(&self) -> &dyn CompletionService {
        self.completions.as_ref()
    }
}

/// Build the application router
///
/// - `GET /` liveness probe
/// - `POST /chat` relay endpoint
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::handler))
        .route("/chat", post(chat::handler))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn create_test_config() -> Config {
        Config::from_str(
            r#"
[server]
host = "127.0.0.1"
port = 3000

[upstream]
url = "http://localhost:9999/v1/chat/completions"
model = "test-model"
api_key = "sk-test"
"#,
        )
        .expect("should parse test config")
    }

    #[test]
    fn test_appstate_new_creates_state() {
        let state = AppState::new(Arc::new(create_test_config())).expect("should create state");
        assert_eq!(state.config().server.port, 3000);
        assert_eq!(state.config().upstream.model(), "test-model");
    }

    #[test]
    fn test_appstate_is_clonable() {
        let state = AppState::new(Arc::new(create_test_config())).expect("should create state");
        let state2 = state.clone();
        assert!(Arc::ptr_eq(&state.config, &state2.config));
    }
}
