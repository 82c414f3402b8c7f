use crate::backends::openai::OpenAiBackend;
use crate::backends::LlmBackend;
use crate::config::{LlmProvider, ModelConfig};
use gentax_core::{GentaxResult, Turn};

/// LLM client that dispatches to the correct provider backend.
///
/// Uses the `LlmBackend` trait to abstract away provider-specific API
/// differences. To add a new provider: implement `LlmBackend` in
/// `backends/` and wire it here.
pub struct LlmClient {
    backend: Box<dyn LlmBackend>,
}

impl LlmClient {
    /// Builds the backend matching the configured provider.
    pub fn new(config: ModelConfig) -> Self {
        let backend: Box<dyn LlmBackend> = match config.provider {
            LlmProvider::Groq | LlmProvider::OpenAi | LlmProvider::OpenRouter => {
                Box::new(OpenAiBackend::new(config))
            }
        };
        Self { backend }
    }

    /// Create from a pre-built backend (for custom/external providers).
    pub fn from_backend(backend: Box<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    /// Non-streaming chat completion over the full turn sequence.
    pub async fn chat(&self, turns: &[Turn]) -> GentaxResult<String> {
        self.backend.chat(turns).await
    }
}
