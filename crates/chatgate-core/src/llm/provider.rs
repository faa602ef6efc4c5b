//! LlmProvider trait definition.
//!
//! This is the core abstraction the completion gateway calls through.
//! Uses RPITIT for `complete` (Rust 2024 edition).

use chatgate_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for hosted chat-completion backends.
///
/// Implementations live in chatgate-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
