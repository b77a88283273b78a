//! Configuration management for the chat relay
//!
//! Parses TOML configuration files, applies environment overrides and
//! provides typed access to settings. Every section is optional so the
//! relay can run from environment variables alone.

use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable overriding `server.port`
pub const PORT_ENV: &str = "PORT";

/// Environment variable supplying the upstream credential
pub const API_KEY_ENV: &str = "AI_API_KEY";

/// Default completion endpoint (OpenRouter, OpenAI-compatible)
pub const DEFAULT_UPSTREAM_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model identifier sent with every upstream request
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";

/// Upper bound for `upstream.timeout_seconds`
const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(skip)]
    env_overrides: EnvOverrides,
}

/// Which settings were taken from the environment by [`Config::load`]
///
/// Loading runs before telemetry exists, so callers log this afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub port: bool,
    pub api_key: bool,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Bearer token authorizing upstream calls
///
/// `Debug` never prints the token so configs can be logged safely.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building the `Authorization` header only
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Upstream completion API configuration
///
/// Fields are private. Values come from deserialization or environment
/// overrides and are checked by `Config::validate()`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_url")]
    url: String,
    #[serde(default = "default_model")]
    model: String,
    #[serde(default)]
    api_key: Option<Credential>,
    /// Per-request timeout. Unset means the call may take as long as upstream needs.
    #[serde(default)]
    timeout_seconds: Option<u64>,
    /// Sent as `HTTP-Referer` for provider-side app attribution
    #[serde(default)]
    referer: Option<String>,
    /// Sent as `X-Title` for provider-side app attribution
    #[serde(default)]
    title: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            model: default_model(),
            api_key: None,
            timeout_seconds: None,
            referer: None,
            title: None,
        }
    }
}

impl UpstreamConfig {
    /// Completion endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Credential, if one was configured
    pub fn api_key(&self) -> Option<&Credential> {
        self.api_key.as_ref()
    }

    /// Outbound timeout, if one was configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    pub fn referer(&self) -> Option<&str> {
        self.referer.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

fn default_upstream_url() -> String {
    DEFAULT_UPSTREAM_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file and validate it
    ///
    /// Environment overrides are not applied; see [`Config::load`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();
        let config = Self::read_file(path.as_ref())?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Build the process configuration
    ///
    /// Reads `path` when given (defaults otherwise), applies `PORT` and
    /// `AI_API_KEY` from the environment, then validates.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with an explicit variable lookup
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (mut config, origin) = match path {
            Some(path) => (Self::read_file(path)?, path.display().to_string()),
            None => (Self::default(), "<defaults>".to_string()),
        };

        config.apply_overrides(lookup)?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: origin,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    fn read_file(path: &Path) -> AppResult<Self> {
        let path_display = path.display().to_string();

        let content =
            std::fs::read_to_string(path).map_err(|source| AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            })?;

        toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
            path: path_display,
            source,
        })
    }

    /// Apply environment overrides; empty values are treated as unset
    pub fn apply_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(port) = var(PORT_ENV) {
            self.server.port = port.trim().parse().map_err(|_| {
                AppError::Config(format!(
                    "{} must be a port number between 0 and 65535, got '{}'",
                    PORT_ENV, port
                ))
            })?;
            self.env_overrides.port = true;
        }

        if let Some(key) = var(API_KEY_ENV) {
            self.upstream.api_key = Some(Credential::new(key));
            self.env_overrides.api_key = true;
        }

        Ok(())
    }

    /// Settings applied from the environment during loading
    pub fn env_overrides(&self) -> EnvOverrides {
        self.env_overrides
    }

    /// Address the server binds to
    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        let ip: IpAddr = self.server.host.parse().map_err(|_| {
            AppError::Config(format!(
                "server.host '{}' is not a valid IP address",
                self.server.host
            ))
        })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Validate configuration after parsing
    ///
    /// The credential is deliberately left alone here: a missing key only
    /// fails the requests that need it.
    pub fn validate(&self) -> AppResult<()> {
        self.socket_addr()?;

        let url = &self.upstream.url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "upstream.url '{}' must start with 'http://' or 'https://'",
                url
            )));
        }

        if self.upstream.model.trim().is_empty() {
            return Err(AppError::Config(
                "upstream.model must not be empty".to_string(),
            ));
        }

        if let Some(timeout) = self.upstream.timeout_seconds {
            if timeout == 0 {
                return Err(AppError::Config(
                    "upstream.timeout_seconds must be greater than 0 (omit it to disable the timeout)"
                        .to_string(),
                ));
            }
            if timeout > MAX_TIMEOUT_SECONDS {
                return Err(AppError::Config(format!(
                    "upstream.timeout_seconds cannot exceed {} seconds, got {}",
                    MAX_TIMEOUT_SECONDS, timeout
                )));
            }
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}
