//! Core types and error definitions for the GenTax service.
//!
//! This crate provides the foundational types shared across all GenTax
//! crates: error handling and the conversation turn representation.
//!
//! # Main types
//!
//! - [`GentaxError`] — Unified error enum for all GenTax subsystems.
//! - [`GentaxResult`] — Convenience alias for `Result<T, GentaxError>`.
//! - [`Role`] — Turn role (system, user, assistant).
//! - [`Turn`] — A single message within a conversation transcript.

use serde::{Deserialize, Serialize};

// --- Error types ---

/// Top-level error type for the GenTax service.
///
/// Each variant corresponds to a subsystem that can produce errors.
#[derive(Debug, thiserror::Error)]
pub enum GentaxError {
    /// A request was rejected before reaching any downstream service.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An error from the hosted chat-completion API.
    #[error("LLM error: {0}")]
    Llm(String),

    /// An error from the external knowledge retriever.
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// An error related to session persistence or lookup.
    #[error("Session error: {0}")]
    Session(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// An error from the HTTP gateway layer.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`GentaxError`].
pub type GentaxResult<T> = Result<T, GentaxError>;

// --- Turn types ---

/// The role of the participant that authored a [`Turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A system-level instruction or prompt.
    System,
    /// A human end-user.
    User,
    /// The AI assistant.
    Assistant,
}

/// A single turn within a conversation transcript.
///
/// Turns serialize to exactly `{"role": ..., "content": ...}`; this is
/// also the on-disk format of the session store, so no additional fields
/// may be added without a storage migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// The role of the turn author.
    pub role: Role,
    /// The textual content of the turn.
    pub content: String,
}

impl Turn {
    /// Creates a new turn with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a new turn with [`Role::System`].
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Creates a new turn with [`Role::User`].
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates a new turn with [`Role::Assistant`].
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}
