//! Axum router configuration with middleware.
//!
//! Routes:
//! - `GET /` chat page, `GET /highlight.css` code highlight classes
//! - `POST /api/chat`, `GET|DELETE /api/chat/{session_id}`
//! - `GET /health`
//!
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::{handlers, page};
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/chat", post(handlers::chat::post_chat))
        .route(
            "/chat/{session_id}",
            get(handlers::session::get_history).delete(handlers::session::delete_session),
        );

    Router::new()
        .route("/", get(page::index))
        .route("/highlight.css", get(page::highlight_css))
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use chatgate_types::chat::{FALLBACK_REPLY, GATEWAY_FAILURE_MESSAGE};
    use chatgate_types::config::GatewayConfig;

    use super::*;
    use crate::testing::ScriptedProvider;

    fn app(provider: ScriptedProvider) -> (Router, AppState) {
        app_with_config(provider, GatewayConfig::default())
    }

    fn app_with_config(provider: ScriptedProvider, config: GatewayConfig) -> (Router, AppState) {
        let state = AppState::with_provider(
            chatgate_core::llm::box_provider::BoxLlmProvider::new(provider),
            config,
        );
        (build_router(state.clone()), state)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn post_chat(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = app(ScriptedProvider::replying("hi"));
        let (status, body) = send(&router, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_index_serves_page() {
        let (router, _) = app(ScriptedProvider::replying("hi"));
        let response = router.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("AI Assistant"));
    }

    #[tokio::test]
    async fn test_chat_returns_trimmed_script() {
        let (router, state) = app(ScriptedProvider::replying("  Hello there!  \n"));
        let (status, body) = send(&router, post_chat(json!({ "prompt": "hello" }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["script"], "Hello there!");
        assert_eq!(body["session_id"], "default");
        assert!(body["html"].as_str().unwrap().contains("Hello there!"));

        let history = state
            .gateway
            .history(&"default".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(history.messages.len(), 3);
    }

    #[tokio::test]
    async fn test_chat_missing_content_uses_fallback() {
        let (router, _) = app(ScriptedProvider::empty());
        let (status, body) = send(&router, post_chat(json!({ "prompt": "hello" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["script"], FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_chat_upstream_failure_is_500_and_leaves_no_orphan() {
        let (router, state) = app(ScriptedProvider::failing());
        let (status, body) = send(
            &router,
            post_chat(json!({ "prompt": "hi", "session_id": "s1" })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": GATEWAY_FAILURE_MESSAGE }));

        let (status, body) = send(&router, get("/api/chat/s1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(state.gateway.sessions().len(), 1);
    }

    #[tokio::test]
    async fn test_chat_rejects_missing_or_blank_prompt() {
        let (router, _) = app(ScriptedProvider::replying("x"));

        let (status, body) = send(&router, post_chat(json!({ "session_id": "a" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send(&router, post_chat(json!({ "prompt": "   " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "prompt must not be empty");
    }

    #[tokio::test]
    async fn test_chat_rejects_malformed_json() {
        let (router, _) = app(ScriptedProvider::replying("x"));
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_chat_rejects_invalid_session_id() {
        let (router, _) = app(ScriptedProvider::replying("x"));
        let (status, _) = send(
            &router,
            post_chat(json!({ "prompt": "hi", "session_id": "not/valid" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_code_fence_rendered_in_html() {
        let (router, _) = app(ScriptedProvider::replying(
            "Run:\n```python\nprint('hi')\n```\n<b>done</b>",
        ));
        let (_, body) = send(&router, post_chat(json!({ "prompt": "code please" }))).await;
        let html = body["html"].as_str().unwrap();
        assert!(html.contains("language-python"));
        assert!(html.contains("copy-btn"));
        assert!(html.contains("&lt;b&gt;done&lt;/b&gt;"));
        assert!(body["script"].as_str().unwrap().contains("```python"));
    }

    #[tokio::test]
    async fn test_history_and_delete() {
        let (router, _) = app(ScriptedProvider::replying("ok"));
        send(&router, post_chat(json!({ "prompt": "one", "session_id": "abc" }))).await;

        let (status, body) = send(&router, get("/api/chat/abc")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session_id"], "abc");
        assert_eq!(body["turns"], 1);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "one");

        let delete = Request::builder()
            .method("DELETE")
            .uri("/api/chat/abc")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&router, delete).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&router, get("/api/chat/abc")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("abc"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_upstream_times_out_as_500() {
        let (router, _) = app(ScriptedProvider::slow(Duration::from_secs(120)));
        let (status, body) = send(&router, post_chat(json!({ "prompt": "hi" }))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], GATEWAY_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_session_limit_is_503() {
        let mut config = GatewayConfig::default();
        config.conversation.max_sessions = 1;
        let (router, state) = app_with_config(ScriptedProvider::replying("ok"), config);

        // An in-flight turn keeps its session from being recycled.
        let held = state
            .gateway
            .sessions()
            .get_or_create(&"busy".parse().unwrap())
            .unwrap();

        let (status, body) = send(
            &router,
            post_chat(json!({ "prompt": "hi", "session_id": "other" })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("session limit"));

        drop(held);
        let (status, _) = send(
            &router,
            post_chat(json!({ "prompt": "hi", "session_id": "other" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_highlight_css_served() {
        let (router, _) = app(ScriptedProvider::replying("x"));
        let response = router.oneshot(get("/highlight.css")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/css; charset=utf-8"
        );
    }
}
