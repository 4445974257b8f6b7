use serde::{Deserialize, Serialize};

/// Model used when the config file does not name one.
pub const DEFAULT_MODEL_ID: &str = "meta-llama/llama-3.3-70b-instruct:free";

/// Supported chat-completion providers.
///
/// All three speak the OpenAI chat-completions wire shape; they differ only
/// in base URL and credentials.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenRouter aggregator (the default, matches the free Llama tier).
    OpenRouter,
    /// OpenAI directly.
    OpenAi,
    /// Groq cloud inference — OpenAI-compatible API, free tier with rate limits.
    Groq,
}

impl Default for LlmProvider {
    fn default() -> Self {
        Self::OpenRouter
    }
}

/// Configuration for the outbound model call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Which provider endpoint to call.
    #[serde(default)]
    pub provider: LlmProvider,
    /// Model identifier passed in the request body.
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// Bearer credential for the provider.
    #[serde(default)]
    pub api_key: String,
    /// Override for the provider base URL (used by tests and proxies).
    #[serde(default)]
    pub api_base_url: Option<String>,
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model_id: default_model_id(),
            api_key: String::new(),
            api_base_url: None,
        }
    }
}

impl ModelConfig {
    /// The provider base URL, honoring the `api_base_url` override.
    pub fn base_url(&self) -> &str {
        if let Some(url) = &self.api_base_url {
            url
        } else {
            match self.provider {
                LlmProvider::OpenRouter => "https://openrouter.ai/api",
                LlmProvider::OpenAi => "https://api.openai.com",
                LlmProvider::Groq => "https://api.groq.com/openai",
            }
        }
    }
}
