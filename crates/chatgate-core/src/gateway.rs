//! Completion gateway.
//!
//! Runs one chat turn against a session: stage the user prompt (compacting if
//! needed), call the completion provider with the staged history, and commit
//! the reply only when the call succeeds. The session lock is held for the
//! whole turn so turns on the same session never interleave. The turn
//! deadline covers both the wait for the lock and the upstream call.

use std::sync::Arc;
use std::time::Duration;

use chatgate_types::chat::{FALLBACK_REPLY, SessionHistory, SessionId};
use chatgate_types::config::{CompletionConfig, GatewayConfig};
use chatgate_types::error::ChatError;
use chatgate_types::llm::{CompletionRequest, LlmError, Message, StopReason, Usage};
use tracing::{Instrument, debug, field, info, info_span, warn};

use crate::conversation::{CompactionPolicy, SessionRegistry};
use crate::llm::box_provider::BoxLlmProvider;

/// Result of a committed chat turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub session_id: SessionId,
    /// Trimmed reply text, or [`FALLBACK_REPLY`].
    pub reply: String,
    /// Whether staging the prompt compacted the history.
    pub compacted: bool,
    /// Committed history length after the turn.
    pub history_len: usize,
    /// True when the provider returned no usable content.
    pub used_fallback: bool,
    /// Why the provider stopped; `MaxTokens` means the reply was cut off.
    pub stop_reason: StopReason,
    pub usage: Usage,
}

/// Forwards chat turns to the completion provider and owns all sessions.
pub struct CompletionGateway {
    provider: BoxLlmProvider,
    sessions: Arc<SessionRegistry>,
    completion: CompletionConfig,
    policy: CompactionPolicy,
}

impl CompletionGateway {
    pub fn new(provider: BoxLlmProvider, config: &GatewayConfig) -> Self {
        Self {
            provider,
            sessions: Arc::new(
                SessionRegistry::new(config.conversation.system_prompt.clone())
                    .with_max_sessions(config.conversation.max_sessions),
            ),
            completion: config.completion.clone(),
            policy: CompactionPolicy::from_config(&config.conversation),
        }
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.completion.model
    }

    /// Build the upstream request for a staged history.
    pub fn build_request(&self, messages: &[Message]) -> CompletionRequest {
        let c = &self.completion;
        CompletionRequest {
            model: c.model.clone(),
            messages: messages.to_vec(),
            max_tokens: c.max_tokens,
            temperature: Some(c.temperature),
            top_p: Some(c.top_p),
            frequency_penalty: Some(c.frequency_penalty),
            presence_penalty: Some(c.presence_penalty),
            n: Some(c.n),
        }
    }

    /// Run one turn on `session_id`.
    ///
    /// On any upstream failure (including the timeout) the session history is
    /// left exactly as it was before the call.
    pub async fn run_turn(
        &self,
        session_id: &SessionId,
        prompt: &str,
    ) -> Result<TurnOutcome, ChatError> {
        if prompt.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }

        let limit = Duration::from_secs(self.completion.timeout_secs);
        let deadline = tokio::time::Instant::now() + limit;
        let timed_out = || -> ChatError {
            LlmError::Timeout {
                after_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            }
            .into()
        };

        let handle = self.sessions.get_or_create(session_id)?;
        let mut session = match tokio::time::timeout_at(deadline, handle.lock()).await {
            Ok(guard) => guard,
            Err(_) => {
                warn!(session_id = %session_id, "session busy until turn deadline");
                return Err(timed_out());
            }
        };

        let pending = session.store.begin_turn(prompt, &self.policy)?;
        let compacted = pending.compacted();
        if compacted {
            info!(
                session_id = %session_id,
                staged_len = pending.messages().len(),
                "compacted conversation history"
            );
        }

        let request = self.build_request(pending.messages());
        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.request.stream = false,
            gen_ai.response.id = field::Empty,
            gen_ai.response.model = field::Empty,
            gen_ai.response.finish_reasons = field::Empty,
            gen_ai.usage.input_tokens = field::Empty,
            gen_ai.usage.output_tokens = field::Empty,
            session_id = %session_id,
        );

        let response = match tokio::time::timeout_at(deadline, self.provider.complete(&request))
            .instrument(span.clone())
            .await
        {
            Ok(result) => result?,
            Err(_) => return Err(timed_out()),
        };

        span.record("gen_ai.response.id", response.id.as_str());
        span.record("gen_ai.response.model", response.model.as_str());
        span.record(
            "gen_ai.response.finish_reasons",
            field::display(response.stop_reason),
        );
        span.record("gen_ai.usage.input_tokens", response.usage.input_tokens);
        span.record("gen_ai.usage.output_tokens", response.usage.output_tokens);

        if response.stop_reason == StopReason::MaxTokens {
            warn!(session_id = %session_id, "reply truncated at max_tokens");
        }

        let (reply, used_fallback) = extract_reply(response.content.as_deref());
        if used_fallback {
            debug!(session_id = %session_id, "provider returned no content, using fallback reply");
        }

        pending.commit(reply.clone(), &mut session.store)?;
        session.record_turn();

        Ok(TurnOutcome {
            session_id: session_id.clone(),
            reply,
            compacted,
            history_len: session.store.len(),
            used_fallback,
            stop_reason: response.stop_reason,
            usage: response.usage,
        })
    }

    /// Snapshot of a session's committed history, if the session exists.
    pub async fn history(&self, session_id: &SessionId) -> Option<SessionHistory> {
        let handle = self.sessions.get(session_id)?;
        let session = handle.lock().await;
        Some(SessionHistory {
            session_id: session_id.to_string(),
            turns: session.turns,
            messages: session.store.messages().to_vec(),
        })
    }

    /// Drop a session. Returns whether it existed.
    pub fn reset(&self, session_id: &SessionId) -> bool {
        self.sessions.reset(session_id)
    }
}

/// Trim provider content, falling back when it is absent or blank.
///
/// Returns the reply text and whether the fallback was used.
pub fn extract_reply(content: Option<&str>) -> (String, bool) {
    match content.map(str::trim) {
        Some(text) if !text.is_empty() => (text.to_string(), false),
        _ => (FALLBACK_REPLY.to_string(), true),
    }
}
