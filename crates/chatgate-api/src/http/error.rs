//! Application error type mapping to HTTP status codes and `{"error": ...}` bodies.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use chatgate_types::chat::{ErrorBody, GATEWAY_FAILURE_MESSAGE};
use chatgate_types::error::ChatError;
use chatgate_types::llm::LlmError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or empty request.
    Validation(String),
    /// Unknown session or resource.
    NotFound(String),
    /// The completion API failed. The cause is logged, never returned.
    Upstream(LlmError),
    /// The gateway cannot take on more work right now.
    Unavailable(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::EmptyPrompt | ChatError::EmptyMessage | ChatError::InvalidSession(_) => {
                AppError::Validation(e.to_string())
            }
            ChatError::SessionNotFound(_) => AppError::NotFound(e.to_string()),
            ChatError::TooManySessions { .. } => AppError::Unavailable(e.to_string()),
            ChatError::Completion(inner) => AppError::Upstream(inner),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Upstream(e) => {
                tracing::error!(error = %e, "completion request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GATEWAY_FAILURE_MESSAGE.to_string(),
                )
            }
            AppError::Unavailable(msg) => {
                tracing::warn!(reason = %msg, "refusing request");
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
