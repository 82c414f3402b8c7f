use super::LlmBackend;
use crate::config::{LlmProvider, ModelConfig};
use gentax_core::{GentaxError, GentaxResult, Turn};
use async_trait::async_trait;

/// OpenAI-compatible API backend.
///
/// Works with Groq, OpenAI, OpenRouter, and any other provider that
/// implements the OpenAI chat completions API.
pub struct OpenAiBackend {
    config: ModelConfig,
    http: reqwest::Client,
}

impl OpenAiBackend {
    /// Creates a backend for the given model configuration.
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

        // OpenRouter requires extra headers
        if matches!(self.config.provider, LlmProvider::OpenRouter) {
            request
                .header("HTTP-Referer", "https://github.com/fboiero/GenTax")
                .header("X-Title", "GenTax")
        } else {
            request
        }
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn chat(&self, turns: &[Turn]) -> GentaxResult<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url());

        // Turn serializes to {role, content}, which is already the
        // chat-completions message shape.
        let body = serde_json::json!({
            "model": self.config.model_id,
            "messages": turns,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        let request = self.add_provider_headers(self.http.post(&url));

        let resp = request
            .json(&body)
            .send()
            .await
            .map_err(|e| GentaxError::Llm(e.to_string()))?;

        let status = resp.status();
        let resp_body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| GentaxError::Llm(e.to_string()))?;

        if !status.is_success() {
            return Err(GentaxError::Llm(format!(
                "API error {status}: {resp_body}"
            )));
        }

        parse_chat_response(&resp_body)
    }
}

/// Extracts the reply text from a chat-completions response body.
pub fn parse_chat_response(body: &serde_json::Value) -> GentaxResult<String> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| GentaxError::Llm(format!("No completion in response: {body}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_response_extracts_content() {
        let body = serde_json::json!({
            "choices": [{
                "message": {"role": "assistant", "content": "GST is 18%."},
                "finish_reason": "stop",
            }],
        });
        assert_eq!(parse_chat_response(&body).unwrap(), "GST is 18%.");
    }

    #[test]
    fn test_parse_chat_response_missing_content_is_an_error() {
        let body = serde_json::json!({"choices": []});
        let err = parse_chat_response(&body).unwrap_err();
        assert!(err.to_string().contains("No completion"));
    }
}
