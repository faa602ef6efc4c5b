//! Session HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/chat/{session_id} - Committed history of a session
//! - DELETE /api/chat/{session_id} - Drop a session

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use chatgate_types::chat::{SessionHistory, SessionId};
use chatgate_types::error::ChatError;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /api/chat/{session_id}
pub async fn get_history(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<SessionHistory>, AppError> {
    let session_id: SessionId = raw_id.parse()?;
    let history = state
        .gateway
        .history(&session_id)
        .await
        .ok_or(ChatError::SessionNotFound(raw_id))?;
    Ok(Json(history))
}

/// DELETE /api/chat/{session_id}
///
/// Idempotent: deleting an unknown session also returns 204.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let session_id: SessionId = raw_id.parse()?;
    let existed = state.gateway.reset(&session_id);
    tracing::info!(session_id = %session_id, existed, "session reset");
    Ok(StatusCode::NO_CONTENT)
}
