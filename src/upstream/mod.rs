//! Upstream completion API: wire types and the HTTP client

pub mod client;
pub mod types;

pub use client::{CompletionService, UpstreamClient};
pub use types::{DecodeError, UpstreamOutcome, UpstreamRequest};
