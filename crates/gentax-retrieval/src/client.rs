use crate::snippet::Snippet;
use gentax_core::{GentaxError, GentaxResult};
use async_trait::async_trait;
use tracing::debug;

/// Trait for retrieval backends.
///
/// Implementations may fail for any transport or provider reason; callers
/// must treat every error as "no results" rather than aborting the chat.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Returns up to `top_k` ranked snippets for `query`.
    async fn retrieve(&self, query: &str, top_k: usize) -> GentaxResult<Vec<Snippet>>;
}

/// Pass-through client for a hosted retrieval API.
///
/// Posts `{"query", "top_k"}` to the configured endpoint and accepts the
/// result either as a bare JSON array of snippets or wrapped in
/// `{"results": [...]}`.
pub struct HttpRetriever {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpRetriever {
    /// Creates a client for the given retrieval endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Retriever for HttpRetriever {
    async fn retrieve(&self, query: &str, top_k: usize) -> GentaxResult<Vec<Snippet>> {
        let body = serde_json::json!({
            "query": query,
            "top_k": top_k,
        });

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| GentaxError::Retrieval(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(GentaxError::Retrieval(format!(
                "Retrieval API error {status}: {error_body}"
            )));
        }

        let payload: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| GentaxError::Retrieval(e.to_string()))?;

        let items = match &payload {
            serde_json::Value::Array(_) => payload.clone(),
            serde_json::Value::Object(map) => map
                .get("results")
                .cloned()
                .unwrap_or(serde_json::Value::Array(vec![])),
            _ => {
                return Err(GentaxError::Retrieval(format!(
                    "Unexpected retrieval payload: {payload}"
                )))
            }
        };

        let snippets: Vec<Snippet> = serde_json::from_value(items)
            .map_err(|e| GentaxError::Retrieval(format!("Malformed snippet list: {e}")))?;

        debug!(query_len = query.len(), count = snippets.len(), "Retrieval completed");
        Ok(snippets)
    }
}

/// Backend used when no retrieval endpoint is configured.
///
/// Always answers with zero snippets, so chats proceed without a context
/// turn or citations.
pub struct NoRetriever;

#[async_trait]
impl Retriever for NoRetriever {
    async fn retrieve(&self, _query: &str, _top_k: usize) -> GentaxResult<Vec<Snippet>> {
        Ok(Vec::new())
    }
}
