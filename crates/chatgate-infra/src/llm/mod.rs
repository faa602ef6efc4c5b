//! LLM provider implementations.
//!
//! Contains the concrete implementation of the [`LlmProvider`] trait defined
//! in `chatgate-core`, plus [`create_provider`], which builds it from the
//! `[completion]` config section.
//!
//! [`LlmProvider`]: chatgate_core::llm::provider::LlmProvider

pub mod openai_compat;

use secrecy::SecretString;

use chatgate_core::llm::box_provider::BoxLlmProvider;
use chatgate_types::config::CompletionConfig;

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::OpenAiCompatConfig;

/// Create a [`BoxLlmProvider`] from the completion config.
///
/// A missing API key is not an error here: requests go out without a valid
/// bearer token and the upstream rejection surfaces per turn.
pub fn create_provider(config: &CompletionConfig, api_key: Option<SecretString>) -> BoxLlmProvider {
    let provider = OpenAiCompatibleProvider::new(OpenAiCompatConfig::from_completion(config, api_key));
    BoxLlmProvider::new(provider)
}
