//! HTTP client for the gateway's chat endpoints.

use chatgate_types::chat::{ChatRequest, ChatResponse, SessionHistory};
use reqwest::StatusCode;

/// Thin reqwest wrapper around `/api/chat`.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    http: reqwest::Client,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn session_url(&self, session_id: &str) -> String {
        format!("{}/api/chat/{session_id}", self.base_url)
    }

    /// Send one prompt. Any non-2xx status is an error.
    pub async fn send(&self, prompt: &str, session_id: &str) -> reqwest::Result<ChatResponse> {
        let request = ChatRequest {
            prompt: prompt.to_string(),
            session_id: Some(session_id.to_string()),
        };
        self.http
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    /// Server-side history, `None` when the session does not exist.
    pub async fn history(&self, session_id: &str) -> reqwest::Result<Option<SessionHistory>> {
        let response = self.http.get(self.session_url(session_id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        response.error_for_status()?.json().await.map(Some)
    }

    /// Drop the server-side session.
    pub async fn reset(&self, session_id: &str) -> reqwest::Result<()> {
        self.http
            .delete(self.session_url(session_id))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
