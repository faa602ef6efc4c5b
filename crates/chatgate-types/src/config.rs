//! Configuration types for chatgate.
//!
//! `GatewayConfig` represents the `chatgate.toml` file that controls the
//! listen address, the upstream completion API, the sampling knobs sent with
//! every request, and the conversation compaction policy. Every field has a
//! default, so an empty file (or no file) yields a working configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Standing instructions seeded as the first message of every conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant. Remember the context of the conversation and respond even if the user makes minor changes to previous tasks.";

/// Prefix of the synthesized system message produced by compaction.
pub const DEFAULT_SUMMARY_PREFIX: &str = "Summary of conversation so far: ";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
}

/// Listen address for `chatgate serve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Upstream completion API and the sampling parameters sent on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// OpenAI-compatible base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the bearer token.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_penalty")]
    pub frequency_penalty: f64,
    #[serde(default = "default_penalty")]
    pub presence_penalty: f64,
    /// Number of completions requested; only the first is used.
    #[serde(default = "default_n")]
    pub n: u8,
    /// Upper bound on a single upstream call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "liquid/lfm-40b".to_string()
}

fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f64 {
    0.7
}

fn default_top_p() -> f64 {
    0.9
}

fn default_penalty() -> f64 {
    0.3
}

fn default_n() -> u8 {
    1
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            frequency_penalty: default_penalty(),
            presence_penalty: default_penalty(),
            n: default_n(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Conversation seeding and compaction policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Compaction fires when the history is longer than this.
    #[serde(default = "default_compaction_threshold")]
    pub compaction_threshold: usize,
    /// Messages kept verbatim after compaction.
    #[serde(default = "default_keep_recent")]
    pub keep_recent: usize,
    #[serde(default = "default_summary_prefix")]
    pub summary_prefix: String,
    /// Idle sessions older than this are evicted. `0` disables eviction.
    #[serde(default = "default_session_idle_ttl_secs")]
    pub session_idle_ttl_secs: u64,
    /// Live session cap. At the cap the least recently active idle session
    /// makes room for a new one. `0` means unlimited.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_compaction_threshold() -> usize {
    10
}

fn default_keep_recent() -> usize {
    5
}

fn default_summary_prefix() -> String {
    DEFAULT_SUMMARY_PREFIX.to_string()
}

fn default_session_idle_ttl_secs() -> u64 {
    3600
}

fn default_max_sessions() -> usize {
    10_000
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            compaction_threshold: default_compaction_threshold(),
            keep_recent: default_keep_recent(),
            summary_prefix: default_summary_prefix(),
            session_idle_ttl_secs: default_session_idle_ttl_secs(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl GatewayConfig {
    /// Check every knob against its documented range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.completion;
        non_empty("completion.base_url", &c.base_url)?;
        non_empty("completion.model", &c.model)?;
        non_empty("completion.api_key_env", &c.api_key_env)?;
        non_empty("conversation.system_prompt", &self.conversation.system_prompt)?;

        check(
            "completion.max_tokens",
            c.max_tokens > 0,
            c.max_tokens,
            "max_tokens > 0",
        )?;
        check(
            "completion.temperature",
            (0.0..=2.0).contains(&c.temperature),
            c.temperature,
            "0 <= temperature <= 2",
        )?;
        check(
            "completion.top_p",
            c.top_p > 0.0 && c.top_p <= 1.0,
            c.top_p,
            "0 < top_p <= 1",
        )?;
        check(
            "completion.frequency_penalty",
            (-2.0..=2.0).contains(&c.frequency_penalty),
            c.frequency_penalty,
            "-2 <= penalty <= 2",
        )?;
        check(
            "completion.presence_penalty",
            (-2.0..=2.0).contains(&c.presence_penalty),
            c.presence_penalty,
            "-2 <= penalty <= 2",
        )?;
        check("completion.n", c.n >= 1, c.n, "n >= 1")?;
        check(
            "completion.timeout_secs",
            c.timeout_secs > 0,
            c.timeout_secs,
            "timeout_secs > 0",
        )?;

        let conv = &self.conversation;
        check(
            "conversation.keep_recent",
            conv.keep_recent > 0 && conv.keep_recent < conv.compaction_threshold,
            conv.keep_recent,
            "0 < keep_recent < compaction_threshold",
        )?;

        Ok(())
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Empty { field })
    } else {
        Ok(())
    }
}

fn check(
    field: &'static str,
    ok: bool,
    value: impl ToString,
    expected: &'static str,
) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value.to_string(),
            expected,
        })
    }
}
