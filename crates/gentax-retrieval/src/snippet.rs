use serde::{Deserialize, Serialize};

/// One ranked snippet returned by the retrieval engine.
///
/// External payloads are not trusted to be complete: every field may be
/// absent, and consumers must fall back to defaults (source →
/// `"knowledge_base"`, chunk id → the snippet's 1-based rank, text →
/// empty) instead of erroring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snippet {
    /// Identifier of the document the snippet was cut from.
    #[serde(default)]
    pub source: Option<String>,
    /// Index of the chunk within its source document.
    #[serde(default)]
    pub chunk_id: Option<u64>,
    /// The snippet text itself.
    #[serde(default)]
    pub text: Option<String>,
}

/// Outcome of a retrieval attempt.
///
/// Keeps "the retriever returned nothing" distinguishable from "the
/// retriever call failed". Both degrade the chat to an uncited answer,
/// but only the latter is a fault worth surfacing in logs.
#[derive(Debug, Clone)]
pub enum Retrieval {
    /// The retriever answered, possibly with zero snippets.
    Hits(Vec<Snippet>),
    /// The retriever call failed and was treated as empty.
    Degraded {
        /// The error that was swallowed.
        reason: String,
    },
}

impl Retrieval {
    /// The retrieved snippets; empty when degraded.
    pub fn snippets(&self) -> &[Snippet] {
        match self {
            Retrieval::Hits(snippets) => snippets,
            Retrieval::Degraded { .. } => &[],
        }
    }

    /// Whether this outcome came from a failed retriever call.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Retrieval::Degraded { .. })
    }
}
