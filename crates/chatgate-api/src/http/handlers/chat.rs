//! Chat endpoint.
//!
//! POST /api/chat
//!
//! Runs one turn through the completion gateway and returns the reply text
//! plus its sanitized HTML rendering. Requests without `session_id` continue
//! the shared default session.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use chatgate_types::chat::{ChatRequest, ChatResponse, SessionId};

use crate::http::error::AppError;
use crate::state::AppState;

/// Resolve the session named by a request, defaulting when absent or blank.
pub fn resolve_session_id(raw: Option<&str>) -> Result<SessionId, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(id) => Ok(id.parse::<SessionId>()?),
        None => Ok(SessionId::default()),
    }
}

/// POST /api/chat - forward a prompt and return `{script, session_id, html}`.
pub async fn post_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(body) = payload?;
    let session_id = resolve_session_id(body.session_id.as_deref())?;

    let started = Instant::now();
    let outcome = state.gateway.run_turn(&session_id, &body.prompt).await?;

    tracing::info!(
        session_id = %outcome.session_id,
        history_len = outcome.history_len,
        compacted = outcome.compacted,
        fallback = outcome.used_fallback,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "chat turn completed"
    );

    let html = state.renderer.render(&outcome.reply);
    Ok(Json(ChatResponse {
        script: outcome.reply,
        session_id: outcome.session_id.to_string(),
        html,
    }))
}
