/// OpenAI-compatible chat-completions backend.
pub mod openai;

use gentax_core::{GentaxResult, Turn};
use async_trait::async_trait;

/// Trait for LLM provider backends.
///
/// Each provider implements this trait to handle API communication.
///
/// To add a new provider:
/// 1. Create a new module in `backends/`
/// 2. Implement `LlmBackend` for your struct
/// 3. Add the variant to `LlmProvider` enum in `config.rs`
/// 4. Wire it up in `LlmClient::new()` in `llm.rs`
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Submits the full ordered turn sequence and returns the reply text.
    ///
    /// One attempt per call; no retries, and no explicit timeout beyond
    /// what the underlying HTTP client applies.
    async fn chat(&self, turns: &[Turn]) -> GentaxResult<String>;
}
