use crate::config::ModelConfig;
use crate::context::{build_context, Citation};
use crate::llm::LlmClient;
use gentax_core::{GentaxError, GentaxResult, Turn};
use gentax_retrieval::{Retrieval, Retriever};
use gentax_session::SessionStore;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// The fixed instruction prompt seeding every session's transcript.
pub const SYSTEM_PROMPT: &str = "You are GenTax, a precise and helpful Indian tax assistant. \
You specialize in Indian taxation including Income Tax, GST, and other tax-related matters. \
Provide accurate, clear, and actionable advice. If you're unsure about something, \
recommend consulting a tax professional. Keep responses concise but comprehensive.";

const DEFAULT_TOP_K: i64 = 5;

/// The result of one successful chat exchange.
#[derive(Debug)]
pub struct ChatAnswer {
    /// The assistant's reply.
    pub answer: String,
    /// The session the exchange was recorded under: the supplied id, or
    /// a freshly generated one.
    pub session_id: String,
    /// One citation per retrieved snippet that was injected as context.
    pub citations: Vec<Citation>,
}

/// The Conversation Assembler: drives one full chat exchange.
/// Resolve session → retrieve context → call LLM → record reply → persist.
pub struct ChatRunner {
    llm: LlmClient,
    retriever: Arc<dyn Retriever>,
    sessions: Arc<dyn SessionStore>,
}

impl ChatRunner {
    /// Builds a runner from the model configuration and injected
    /// collaborators.
    pub fn new(
        config: ModelConfig,
        retriever: Arc<dyn Retriever>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            llm: LlmClient::new(config),
            retriever,
            sessions,
        }
    }

    /// Builds a runner from a pre-built LLM client (for custom backends).
    pub fn from_client(
        llm: LlmClient,
        retriever: Arc<dyn Retriever>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            llm,
            retriever,
            sessions,
        }
    }

    /// Runs one chat exchange. Returns the reply, the resolved session id,
    /// and the citations for any injected context.
    ///
    /// An empty question is rejected before any session mutation or
    /// external call. Retrieval failure degrades to an uncited answer.
    /// LLM failure is returned to the caller; the already-appended user
    /// turn stays in the in-memory transcript but nothing is persisted
    /// until a later exchange on the session succeeds.
    pub async fn run(
        &self,
        question: &str,
        session_id: Option<String>,
        top_k: Option<i64>,
    ) -> GentaxResult<ChatAnswer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(GentaxError::Validation("Empty question".to_string()));
        }

        let top_k = top_k.unwrap_or(DEFAULT_TOP_K).clamp(1, 10) as usize;
        let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());

        // Same-session exchanges serialize on this guard; distinct
        // sessions proceed concurrently.
        let _guard = self.sessions.lock_session(&session_id).lock_owned().await;

        self.sessions.get_or_create(&session_id, SYSTEM_PROMPT).await;

        let retrieval = match self.retriever.retrieve(question, top_k).await {
            Ok(snippets) => Retrieval::Hits(snippets),
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Retrieval failed, continuing without context");
                Retrieval::Degraded {
                    reason: e.to_string(),
                }
            }
        };

        let mut citations = Vec::new();
        if let Some(block) = build_context(retrieval.snippets()) {
            self.sessions.append(&session_id, block.turn).await?;
            citations = block.citations;
        }

        self.sessions
            .append(&session_id, Turn::user(question))
            .await?;

        let turns = self
            .sessions
            .transcript(&session_id)
            .await
            .ok_or_else(|| GentaxError::Session(format!("Unknown session: {session_id}")))?;

        info!(
            session_id = %session_id,
            turns = turns.len(),
            citations = citations.len(),
            degraded = retrieval.is_degraded(),
            "Submitting chat completion"
        );

        let answer = self.llm.chat(&turns).await?;

        self.sessions
            .append(&session_id, Turn::assistant(answer.as_str()))
            .await?;
        self.sessions.persist().await?;

        Ok(ChatAnswer {
            answer,
            session_id,
            citations,
        })
    }
}
