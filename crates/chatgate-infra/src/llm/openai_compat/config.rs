//! Configuration for the OpenAI-compatible provider.
//!
//! [`OpenAiCompatConfig::from_completion`] turns the `[completion]` section of
//! `chatgate.toml` plus the resolved API key into provider settings.

use chatgate_types::config::CompletionConfig;
use secrecy::SecretString;

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`]. Not `Debug`: the
/// API key must never end up in logs.
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openrouter").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://openrouter.ai/api/v1").
    pub base_url: String,
    /// Bearer token. `None` sends an empty key and lets the upstream reject it.
    pub api_key: Option<SecretString>,
    /// Model identifier (e.g., "liquid/lfm-40b").
    pub model: String,
}

impl OpenAiCompatConfig {
    /// Build provider settings from the completion config section.
    pub fn from_completion(config: &CompletionConfig, api_key: Option<SecretString>) -> Self {
        Self {
            provider_name: provider_name_for(&config.base_url).to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        }
    }
}

/// Name reported in spans and logs, derived from the endpoint host.
fn provider_name_for(base_url: &str) -> &'static str {
    if base_url.contains("openrouter.ai") {
        "openrouter"
    } else if base_url.contains("api.openai.com") {
        "openai"
    } else {
        "openai_compat"
    }
}
