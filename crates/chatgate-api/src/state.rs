//! Application state shared by the HTTP handlers.
//!
//! Holds the completion gateway (which owns every session), the HTML
//! renderer, and the effective configuration.

use std::sync::Arc;

use chatgate_core::gateway::CompletionGateway;
use chatgate_core::llm::box_provider::BoxLlmProvider;
use chatgate_infra::llm::create_provider;
use chatgate_infra::secret::resolve_api_key;
use chatgate_types::config::GatewayConfig;

use crate::http::render::HtmlRenderer;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<CompletionGateway>,
    pub renderer: Arc<HtmlRenderer>,
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    /// Wire the OpenAI-compatible provider and the gateway from config.
    ///
    /// A missing API key is logged, not fatal: every turn then fails upstream
    /// and is reported to clients as a generic failure.
    pub fn init(config: GatewayConfig) -> Self {
        let api_key = resolve_api_key(&config.completion.api_key_env);
        if api_key.is_none() {
            tracing::warn!(
                env = %config.completion.api_key_env,
                "API key not set; completion requests will be rejected upstream"
            );
        }
        let provider = create_provider(&config.completion, api_key);
        Self::with_provider(provider, config)
    }

    /// Build state around an already constructed provider.
    pub fn with_provider(provider: BoxLlmProvider, config: GatewayConfig) -> Self {
        let gateway = CompletionGateway::new(provider, &config);
        Self {
            gateway: Arc::new(gateway),
            renderer: Arc::new(HtmlRenderer::new()),
            config: Arc::new(config),
        }
    }
}
