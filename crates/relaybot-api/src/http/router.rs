//! Axum router configuration with middleware.
//!
//! Routes: `POST /api/chat` and `GET /health`.
//! Middleware: CORS, tracing.
//!
//! When the configured web directory exists, its files are served for any
//! other path so the static chat page can be loaded from the same origin.

use std::path::Path;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the relay router with all routes and middleware.
pub fn build_router(state: AppState, web_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/api/chat", post(handlers::chat::chat))
        .route("/health", get(handlers::health::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if Path::new(web_dir).is_dir() {
        let index_path = Path::new(web_dir).join("index.html");
        let serve_dir = ServeDir::new(web_dir).fallback(ServeFile::new(index_path));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %web_dir, "Static chat page enabled");
    }

    router
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use relaybot_core::transcript::store::TranscriptStore;
    use relaybot_types::config::StoreFailurePolicy;
    use relaybot_types::turn::{Sender, SessionId};

    use crate::http::error::{GENERIC_FAILURE, MISSING_FIELDS};
    use crate::test_support::{FixedClassifier, test_state};

    const NO_WEB_DIR: &str = "/nonexistent/relaybot-web";

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(router: Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn turn_count(state: &AppState) -> u64 {
        state.relay.store().count_turns().await.unwrap()
    }

    #[tokio::test]
    async fn chat_returns_reply_and_logs_exchange() {
        let state = test_state(
            FixedClassifier::replying("Hi there!"),
            StoreFailurePolicy::FailTurn,
        )
        .await;
        let router = build_router(state.clone(), NO_WEB_DIR);

        let (status, body) = send(
            router,
            chat_request(r#"{"message":"Hello","sessionId":"abc"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "reply": "Hi there!" }));

        let conversation = state
            .relay
            .store()
            .conversation(&SessionId::new("abc").unwrap())
            .await
            .unwrap();
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.turns[0].sender, Sender::User);
        assert_eq!(conversation.turns[0].message, "Hello");
        assert_eq!(conversation.turns[1].sender, Sender::Bot);
        assert_eq!(conversation.turns[1].message, "Hi there!");
    }

    #[tokio::test]
    async fn chat_missing_session_id_is_bad_request() {
        let state = test_state(FixedClassifier::replying("x"), StoreFailurePolicy::FailTurn).await;
        let router = build_router(state.clone(), NO_WEB_DIR);

        let (status, body) = send(router, chat_request(r#"{"message":"Hello"}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_REQUEST");
        assert_eq!(body["error"]["message"], MISSING_FIELDS);
        assert_eq!(turn_count(&state).await, 0);
    }

    #[tokio::test]
    async fn chat_empty_message_is_bad_request() {
        let state = test_state(FixedClassifier::replying("x"), StoreFailurePolicy::FailTurn).await;
        let router = build_router(state.clone(), NO_WEB_DIR);

        let (status, body) = send(
            router,
            chat_request(r#"{"message":"","sessionId":"abc"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_REQUEST");
        assert_eq!(turn_count(&state).await, 0);
    }

    #[tokio::test]
    async fn chat_malformed_json_is_bad_request() {
        let state = test_state(FixedClassifier::replying("x"), StoreFailurePolicy::FailTurn).await;
        let router = build_router(state, NO_WEB_DIR);

        let (status, body) = send(router, chat_request("{not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn chat_classifier_failure_is_server_error_without_writes() {
        let state = test_state(FixedClassifier::unreachable(), StoreFailurePolicy::FailTurn).await;
        let router = build_router(state.clone(), NO_WEB_DIR);

        let (status, body) = send(
            router,
            chat_request(r#"{"message":"Hello","sessionId":"abc"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "CLASSIFIER_FAILED");
        assert_eq!(body["error"]["message"], GENERIC_FAILURE);
        assert_eq!(turn_count(&state).await, 0);
    }

    #[tokio::test]
    async fn chat_store_failure_fails_turn_by_default() {
        let state = test_state(FixedClassifier::replying("Hi"), StoreFailurePolicy::FailTurn).await;
        state.db_pool.close().await;
        let router = build_router(state, NO_WEB_DIR);

        let (status, body) = send(
            router,
            chat_request(r#"{"message":"Hello","sessionId":"abc"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "STORE_WRITE_FAILED");
        assert_eq!(body["error"]["message"], GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn chat_store_failure_best_effort_still_replies() {
        let state = test_state(FixedClassifier::replying("Hi"), StoreFailurePolicy::BestEffort).await;
        state.db_pool.close().await;
        let router = build_router(state, NO_WEB_DIR);

        let (status, body) = send(
            router,
            chat_request(r#"{"message":"Hello","sessionId":"abc"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], "Hi");
    }

    #[tokio::test]
    async fn health_reports_turn_count() {
        let state = test_state(FixedClassifier::replying("Hi"), StoreFailurePolicy::FailTurn).await;
        state.relay.handle_turn("abc", "Hello").await.unwrap();
        let router = build_router(state, NO_WEB_DIR);

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router, req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["turns"], 2);
    }

    #[tokio::test]
    async fn web_dir_is_served_as_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>chat</html>").unwrap();
        let state = test_state(FixedClassifier::replying("Hi"), StoreFailurePolicy::FailTurn).await;
        let router = build_router(state, dir.path().to_str().unwrap());

        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = router.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"<html>chat</html>");
    }

    #[tokio::test]
    async fn shipped_chat_page_works_without_secure_context() {
        let web_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../web");
        let state = test_state(FixedClassifier::replying("Hi"), StoreFailurePolicy::FailTurn).await;
        let router = build_router(state, web_dir);

        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = router.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("Hello! How can I help you today?"));
        assert!(page.contains("Sorry, I am having trouble connecting."));
        // Plain-http LAN origins have no crypto.randomUUID.
        assert!(page.contains("crypto.getRandomValues"));
        assert!(page.contains("if (crypto.randomUUID)"));
    }
}
