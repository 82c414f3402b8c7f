//! Session transcripts and their flat-file persistence.
//!
//! A session is an opaque string id owning an ordered, append-only vector
//! of [`gentax_core::Turn`]s. The whole mapping lives in memory and is
//! rewritten to a single JSON document on every successful exchange.
//!
//! # Main types
//!
//! - [`SessionStore`] — Trait for transcript storage backends.
//! - [`FileSessionStore`] — The flat-file backed store used in production.

/// Session store trait and file-backed implementation.
pub mod store;

pub use store::{FileSessionStore, SessionStore};
