//! chat-relay - minimal HTTP relay for LLM chat completions
//!
//! Accepts `POST /chat` with a message, forwards it to an OpenAI-compatible
//! completion API and returns the reply text.

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod telemetry;
pub mod upstream;
