use crate::config::{LlmProvider, ModelConfig};
use crate::LlmGateway;
use async_trait::async_trait;
use sdrbot_core::{SdrbotError, SdrbotResult};
use tracing::debug;

/// Chat-completions client.
///
/// Works with OpenRouter, OpenAI, Groq, and any other provider that
/// implements the OpenAI chat completions API. One synchronous (from the
/// caller's point of view) request per [`complete`](LlmGateway::complete)
/// call: no retry, no backoff, no timeout override, no streaming.
pub struct LlmClient {
    config: ModelConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Creates a client for the given model configuration.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn add_provider_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json");

        // OpenRouter asks callers to identify themselves
        if matches!(self.config.provider, LlmProvider::OpenRouter) {
            request
                .header("HTTP-Referer", "https://github.com/sdrbot/sdrbot")
                .header("X-Title", "sdrbot")
        } else {
            request
        }
    }
}

#[async_trait]
impl LlmGateway for LlmClient {
    async fn complete(&self, prompt: &str) -> SdrbotResult<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url());

        let body = serde_json::json!({
            "model": self.config.model_id,
            "messages": [{"role": "user", "content": prompt}],
        });

        debug!(model = %self.config.model_id, prompt_len = prompt.len(), "LLM request");

        let resp = self
            .add_provider_headers(self.http.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| SdrbotError::Llm(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SdrbotError::Llm(format!(
                "provider returned {status}: {error_body}"
            )));
        }

        let resp_body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| SdrbotError::Llm(e.to_string()))?;

        parse_completion(&resp_body)
    }
}

/// Extracts the first completion's text from a chat-completions response.
///
/// The content is returned verbatim — no trimming, no length or format
/// validation. A body without `choices[0].message.content` counts as a failed
/// request, not as an empty completion.
pub fn parse_completion(body: &serde_json::Value) -> SdrbotResult<String> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| {
            SdrbotError::Llm(format!(
                "response body missing choices[0].message.content: {body}"
            ))
        })
}
