//! Command-line interface for the chat relay

use clap::{Parser, Subcommand};

/// Minimal HTTP relay for LLM chat completions
#[derive(Parser)]
#[command(name = "chat-relay")]
#[command(version)]
#[command(about = "Minimal HTTP relay that forwards chat messages to an LLM completion API")]
#[command(
    long_about = "chat-relay exposes POST /chat, forwards the message to an OpenAI-compatible \
    completion API and returns the reply. Settings come from an optional TOML file; PORT and \
    AI_API_KEY in the environment override it."
)]
pub struct Cli {
    /// Path to configuration file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# chat-relay configuration
#
# Every section is optional. Environment variables win over this file:
#   PORT        -> server.port
#   AI_API_KEY  -> upstream.api_key

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"

# Port to listen on
port = 3000

[upstream]
# OpenAI-compatible chat completions endpoint
url = "https://openrouter.ai/api/v1/chat/completions"

# Model identifier sent with every request
model = "openai/gpt-3.5-turbo"

# Bearer token. Prefer AI_API_KEY so the secret stays out of files.
# api_key = "sk-..."

# Outbound timeout in seconds (1-300). Leave unset for no timeout.
# timeout_seconds = 30

# Optional attribution headers (HTTP-Referer / X-Title)
# referer = "https://example.com"
# title = "Chat Relay"

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
# RUST_LOG overrides this when set.
log_level = "info"
"#
}
