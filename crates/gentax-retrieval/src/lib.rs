//! Knowledge-base retrieval contract and HTTP pass-through client.
//!
//! The retrieval engine itself is an external collaborator; this crate
//! only defines its contract and a thin HTTP client for reaching it.
//! Retrieval is strictly best-effort: callers degrade to an empty result
//! on any error rather than failing the chat (fail-open).
//!
//! # Main types
//!
//! - [`Retriever`] — Trait for retrieval backends.
//! - [`HttpRetriever`] — Pass-through client for a hosted retrieval API.
//! - [`NoRetriever`] — Backend used when no retrieval endpoint is configured.
//! - [`Snippet`] — One ranked knowledge-base snippet with provenance.
//! - [`Retrieval`] — Outcome distinguishing "no results" from "retriever failed".

/// Retriever trait and backends.
pub mod client;
/// Snippet payloads and the retrieval outcome type.
pub mod snippet;

pub use client::{HttpRetriever, NoRetriever, Retriever};
pub use snippet::{Retrieval, Snippet};
