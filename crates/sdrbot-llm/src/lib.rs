//! LLM gateway for sdrbot.
//!
//! One shared client for the single outbound dependency of the whole system:
//! a chat-completions endpoint (OpenRouter by default). All entry points call
//! the same [`LlmGateway::complete`] contract instead of re-implementing the
//! HTTP exchange; test doubles implement the trait to keep flows offline.

/// HTTP client implementing the gateway contract.
pub mod client;
/// Provider and model configuration.
pub mod config;
/// Prompt builders for the qualification flows.
pub mod prompts;

pub use client::LlmClient;
pub use config::{LlmProvider, ModelConfig, DEFAULT_MODEL_ID};

use async_trait::async_trait;
use sdrbot_core::SdrbotResult;

/// The one typed contract every driver uses to reach the model.
///
/// `prompt` is an arbitrary non-empty string assembled by the caller,
/// including (where relevant) a rendered copy of the full conversation
/// history — the provider keeps no state between calls. Repeating a call with
/// the same prompt performs a new remote inference and may yield a different
/// result.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Sends `prompt` as a single user message and returns the model's text.
    async fn complete(&self, prompt: &str) -> SdrbotResult<String>;
}
