//! HTTP API for the GenTax service.
//!
//! Exposes the chat, session-creation, and health endpoints plus the
//! static landing page, and maps internal outcomes to HTTP status codes.

/// HTTP error mapping.
pub mod error;
/// Router, state, and request handlers.
pub mod server;

pub use error::ApiError;
pub use server::{build_router, AppState, ChatRequest, ChatResponse, SessionResponse};
