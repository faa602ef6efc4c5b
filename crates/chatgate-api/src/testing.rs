//! Scripted completion provider for router and client tests.

use std::future::Future;
use std::time::Duration;

use chatgate_core::llm::provider::LlmProvider;
use chatgate_types::llm::{CompletionRequest, CompletionResponse, LlmError, StopReason, Usage};

#[derive(Clone)]
enum Script {
    Reply(Option<String>),
    Fail,
}

pub struct ScriptedProvider {
    script: Script,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            script: Script::Reply(Some(text.to_string())),
            delay: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            script: Script::Reply(None),
            ..Self::replying("")
        }
    }

    pub fn failing() -> Self {
        Self {
            script: Script::Fail,
            ..Self::replying("")
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::replying("late")
        }
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn complete(
        &self,
        _request: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
        let script = self.script.clone();
        let delay = self.delay;
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            match script {
                Script::Reply(content) => Ok(CompletionResponse {
                    id: "scripted-1".to_string(),
                    content,
                    model: "scripted-model".to_string(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage {
                        input_tokens: 10,
                        output_tokens: 5,
                    },
                }),
                Script::Fail => Err(LlmError::Provider {
                    message: "upstream exploded".to_string(),
                }),
            }
        }
    }
}
