//! Chat session identifiers and the `/api/chat` wire format.
//!
//! These types are shared by the gateway handlers and the terminal client so
//! both sides agree on the JSON shapes.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::ChatError;
use crate::llm::Message;

/// Session used when a request does not name one.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Reply text committed when the provider returns no usable content.
pub const FALLBACK_REPLY: &str = "No script generated.";

/// Error body returned for any upstream failure.
pub const GATEWAY_FAILURE_MESSAGE: &str = "Failed to generate script.";

/// Placeholder a client shows when the gateway cannot be reached.
pub const CLIENT_ERROR_REPLY: &str = "Error communicating with the chatbot.";

/// Longest accepted session identifier.
const MAX_SESSION_ID_LEN: usize = 128;

/// Key of a conversation in the session registry.
///
/// Restricted to ASCII alphanumerics, `-` and `_` so ids can travel in URL
/// paths without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        SessionId(DEFAULT_SESSION_ID.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionId {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = !s.is_empty()
            && s.len() <= MAX_SESSION_ID_LEN
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(SessionId(s.to_string()))
        } else {
            Err(ChatError::InvalidSession(s.to_string()))
        }
    }
}

impl TryFrom<String> for SessionId {
    type Error = ChatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user prompt.
    pub prompt: String,
    /// Conversation to continue; the shared default session when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Success body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Assistant reply text (trimmed), or [`FALLBACK_REPLY`].
    pub script: String,
    /// Session the turn was committed to.
    pub session_id: String,
    /// Sanitized HTML rendering of `script` for browser clients.
    #[serde(default)]
    pub html: String,
}

/// Failure body for every non-2xx gateway response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body for `GET /api/chat/{session_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionHistory {
    pub session_id: String,
    pub turns: u64,
    pub messages: Vec<Message>,
}
