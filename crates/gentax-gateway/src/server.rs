use crate::error::ApiError;
use gentax_agent::{ChatRunner, Citation};
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

/// Shared application state.
pub struct AppState {
    /// The conversation assembler handling chat exchanges.
    pub runner: Arc<ChatRunner>,
    /// Service name reported by the health endpoint.
    pub service: String,
    /// Directory the landing page and static assets are served from.
    pub static_dir: PathBuf,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's question.
    pub question: String,
    /// Session to continue; a fresh one is created when absent.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Requested snippet count; clamped into [1, 10] downstream, and any
    /// non-numeric value falls back to the default.
    #[serde(default, deserialize_with = "lenient_top_k")]
    pub top_k: Option<i64>,
}

/// Body of a successful `POST /api/chat`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// The assistant's reply.
    pub answer: String,
    /// The session the exchange was recorded under.
    pub session_id: String,
    /// Citations for the injected context; omitted when none.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
}

/// Body of `POST /api/new-session`.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// The freshly generated session id.
    pub session_id: String,
    /// Human-readable confirmation.
    pub message: String,
}

/// Accepts `top_k` as a number or a numeric string; anything else reads
/// as absent so the caller's default applies instead of a 4xx.
fn lenient_top_k<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

/// Builds the complete API router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_dir = state.static_dir.clone();
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/new-session", post(new_session_handler))
        .route("/api/health", get(health_handler))
        .route("/", get(index_handler))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let result = state
        .runner
        .run(&req.question, req.session_id, req.top_k)
        .await?;

    Ok(Json(ChatResponse {
        answer: result.answer,
        session_id: result.session_id,
        citations: result.citations,
    }))
}

async fn new_session_handler() -> Json<SessionResponse> {
    let session_id = Uuid::new_v4().to_string();
    info!(session_id = %session_id, "New session id issued");
    Json(SessionResponse {
        session_id,
        message: "New session created".to_string(),
    })
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": state.service,
    }))
}

/// Minimal page served when the static landing page is missing.
const FALLBACK_PAGE: &str = "<!DOCTYPE html>\n<html>\n<head><title>GenTax</title></head>\n\
<body><h1>GenTax</h1><p>The chat UI is not installed. POST to /api/chat instead.</p></body>\n</html>\n";

async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    match tokio::fs::read_to_string(state.static_dir.join("index.html")).await {
        Ok(page) => Html(page),
        Err(_) => Html(FALLBACK_PAGE.to_string()),
    }
}
