use gentax_core::Turn;
use gentax_retrieval::Snippet;
use serde::Serialize;

/// Provenance metadata identifying which retrieved snippet contributed to
/// an answer. Produced per chat call, never persisted.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Citation {
    /// 1-based rank of the snippet, as a string.
    pub id: String,
    /// Source document identifier.
    pub source: String,
    /// Chunk index within the source document.
    pub chunk_id: u64,
}

/// The synthetic context turn injected ahead of a user question, paired
/// with the citation list that mirrors it entry for entry.
#[derive(Debug, Clone)]
pub struct ContextBlock {
    /// Assistant-role turn carrying the labeled snippet block.
    pub turn: Turn,
    /// One citation per snippet, in rank order.
    pub citations: Vec<Citation>,
}

const FALLBACK_SOURCE: &str = "knowledge_base";

/// Formats retrieved snippets into a single context turn and its parallel
/// citation list. Returns `None` when there is nothing to inject.
///
/// Each snippet renders as `[{rank}] {source}#chunk{chunk_id}` followed by
/// its text, snippets separated by a blank line, the whole block prefixed
/// with a `CONTEXT:` header. Missing snippet fields fall back to defaults
/// instead of erroring: the source to `"knowledge_base"`, the chunk id to
/// the 1-based rank, the text to the empty string.
pub fn build_context(snippets: &[Snippet]) -> Option<ContextBlock> {
    if snippets.is_empty() {
        return None;
    }

    let mut citations = Vec::with_capacity(snippets.len());
    let mut entries = Vec::with_capacity(snippets.len());

    for (idx, snippet) in snippets.iter().enumerate() {
        let rank = (idx + 1) as u64;
        let source = snippet
            .source
            .clone()
            .unwrap_or_else(|| FALLBACK_SOURCE.to_string());
        let chunk_id = snippet.chunk_id.unwrap_or(rank);
        let text = snippet.text.as_deref().unwrap_or_default();

        entries.push(format!("[{rank}] {source}#chunk{chunk_id}\n{text}"));
        citations.push(Citation {
            id: rank.to_string(),
            source,
            chunk_id,
        });
    }

    let content = format!("CONTEXT:\n{}", entries.join("\n\n"));

    Some(ContextBlock {
        turn: Turn::assistant(content),
        citations,
    })
}
