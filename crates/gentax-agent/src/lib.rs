//! Conversation assembly and LLM access for the GenTax service.
//!
//! This crate owns everything between an incoming question and the
//! assistant's reply: provider configuration, the chat-completion
//! backend, context-block formatting for retrieved snippets, and the
//! [`ChatRunner`] that drives a full exchange against the session store.

/// LLM provider backends.
pub mod backends;
/// Provider selection and model parameters.
pub mod config;
/// Context-block formatting and citations.
pub mod context;
/// Provider-dispatching LLM client.
pub mod llm;
/// The conversation assembler.
pub mod runner;

pub use config::{LlmProvider, ModelConfig};
pub use context::{Citation, ContextBlock};
pub use llm::LlmClient;
pub use runner::{ChatAnswer, ChatRunner, SYSTEM_PROMPT};
