use serde::{Deserialize, Serialize};

/// Hosted chat-completion providers.
///
/// All supported providers speak the OpenAI chat-completions wire format,
/// so they share a single backend and differ only in base URL and headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Groq cloud inference — OpenAI-compatible API, free tier with rate limits.
    Groq,
    /// OpenAI.
    OpenAi,
    /// OpenRouter model aggregator.
    OpenRouter,
}

/// Model selection and sampling parameters for the chat-completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Which provider to call.
    #[serde(default = "default_provider")]
    pub provider: LlmProvider,
    /// Provider-side model identifier.
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// API key for the provider. Usually injected from the environment at
    /// startup rather than written into the config file.
    #[serde(default)]
    pub api_key: String,
    /// Overrides the provider's default API base URL.
    pub api_base_url: Option<String>,
    /// Sampling temperature. Kept low so tax answers stay deterministic-leaning.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Upper bound on the length of a single reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_provider() -> LlmProvider {
    LlmProvider::Groq
}

fn default_model_id() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    512
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model_id: default_model_id(),
            api_key: String::new(),
            api_base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl ModelConfig {
    /// The API base URL: the explicit override if set, otherwise the
    /// provider default.
    pub fn base_url(&self) -> &str {
        if let Some(url) = &self.api_base_url {
            url
        } else {
            match self.provider {
                LlmProvider::Groq => "https://api.groq.com/openai",
                LlmProvider::OpenAi => "https://api.openai.com",
                LlmProvider::OpenRouter => "https://openrouter.ai/api",
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&LlmProvider::Groq).unwrap(), "\"groq\"");
        assert_eq!(
            serde_json::to_string(&LlmProvider::OpenRouter).unwrap(),
            "\"openrouter\""
        );
    }

    #[test]
    fn test_base_url_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.base_url(), "https://api.groq.com/openai");

        let config = ModelConfig {
            provider: LlmProvider::OpenAi,
            ..Default::default()
        };
        assert_eq!(config.base_url(), "https://api.openai.com");

        let config = ModelConfig {
            provider: LlmProvider::OpenRouter,
            ..Default::default()
        };
        assert_eq!(config.base_url(), "https://openrouter.ai/api");
    }

    #[test]
    fn test_base_url_custom_override() {
        let config = ModelConfig {
            api_base_url: Some("http://localhost:8080".to_string()),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_deserialization_with_defaults() {
        let toml_str = r#"
            api_key = "gsk-test"
        "#;
        let config: ModelConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(config.provider, LlmProvider::Groq));
        assert_eq!(config.model_id, "llama-3.1-8b-instant");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_tokens, 512);
        assert!(config.api_base_url.is_none());
    }
}
