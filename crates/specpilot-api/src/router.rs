//! Router configuration and server setup.

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::handlers;
use crate::state::AppState;

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origins = if config.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Creates the API router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Sessions
        .route("/api/session/start", post(handlers::start_session))
        .route("/api/session/continue", post(handlers::continue_session))
        .route("/api/session/:id/status", get(handlers::session_status))
        .route("/api/session/:id/collected-info", get(handlers::collected_info))
        .route("/api/session/:id/quality", get(handlers::session_quality))
        .route("/api/session/:id/reset", post(handlers::reset_session))
        .route("/api/sessions", get(handlers::list_sessions))
        // Documents
        .route("/api/srs/:id", get(handlers::get_srs))
        .layer(middleware)
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Starts the API server and runs until Ctrl-C.
pub async fn serve(state: AppState) -> Result<(), std::io::Error> {
    let addr = state.config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use specpilot_orchestrator::{SessionService, Workflow};
    use specpilot_persistence::FileSessionStore;
    use std::sync::Arc;
    use tempfile::tempdir;

    const SHOP_REQUEST: &str = "온라인 쇼핑몰을 만들고 싶습니다. 결제와 회원가입 기능이 필요합니다.";

    fn make_server() -> TestServer {
        let state = AppState::new(
            ApiConfig::default(),
            SessionService::in_memory(Workflow::stub(10)),
        );
        TestServer::new(create_router(state)).unwrap()
    }

    async fn start(server: &TestServer) -> String {
        let response = server
            .post("/api/session/start")
            .json(&json!({ "initial_input": SHOP_REQUEST }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        body["session_id"].as_str().unwrap().to_string()
    }

    async fn answer(server: &TestServer, id: &str, text: &str) -> Value {
        let response = server
            .post("/api/session/continue")
            .json(&json!({ "session_id": id, "user_response": text }))
            .await;
        response.assert_status_ok();
        response.json()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let server = make_server();
        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert!(!body["version"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_session() {
        let server = make_server();
        let response = server
            .post("/api/session/start")
            .json(&json!({ "initial_input": SHOP_REQUEST }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert!(!body["session_id"].as_str().unwrap().is_empty());
        assert_eq!(body["questions"].as_array().unwrap().len(), 1);
        assert_eq!(body["is_complete"], false);
        assert_eq!(body["iteration_count"], 1);
    }

    #[tokio::test]
    async fn test_short_input_is_unprocessable() {
        let server = make_server();
        let response = server
            .post("/api/session/start")
            .json(&json!({ "initial_input": "쇼핑몰" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("initial_input"));

        let list: Value = server.get("/api/sessions").await.json();
        assert_eq!(list["total"], 0);
    }

    #[tokio::test]
    async fn test_malformed_bodies_use_error_shape() {
        let server = make_server();

        let response = server
            .post("/api/session/start")
            .text("{\"initial_input\": ")
            .content_type("application/json")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().starts_with("bad request"));
        assert!(body["session_id"].is_null());

        let response = server
            .post("/api/session/continue")
            .json(&json!({ "session_id": "abc" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("user_response"));
        assert!(body["session_id"].is_null());

        let response = server
            .post("/api/session/start")
            .text("온라인 쇼핑몰을 만들고 싶습니다")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body.get("error").is_some());
    }

    #[tokio::test]
    async fn test_continue_unknown_session() {
        let server = make_server();
        let response = server
            .post("/api/session/continue")
            .json(&json!({ "session_id": "nonexistent-id", "user_response": "anything" }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body["session_id"], "nonexistent-id");
        assert!(body["error"].as_str().unwrap().contains("not found"));

        server
            .get("/api/session/nonexistent-id/status")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_full_conversation_and_export() {
        let server = make_server();
        let id = start(&server).await;

        answer(&server, &id, "카카오 로그인으로 회원 인증을 하려고 해요").await;
        answer(&server, &id, "AWS에 배포할 예정입니다").await;
        answer(&server, &id, "동시 접속자는 1만 명 정도 예상합니다").await;
        let last = answer(&server, &id, "결제는 토스페이먼츠를 사용할게요").await;

        assert_eq!(last["is_complete"], true);
        assert_eq!(
            last["final_srs"]["functional_requirements"][0]["id"],
            "FR-001"
        );

        let info: Value = server
            .get(&format!("/api/session/{}/collected-info", id))
            .await
            .json();
        assert_eq!(info["collected_info"]["payment"], "토스페이먼츠");
        assert_eq!(info["collected_info"]["initial_request"], SHOP_REQUEST);

        let quality: Value = server
            .get(&format!("/api/session/{}/quality", id))
            .await
            .json();
        assert_eq!(quality["completeness"], 1.0);
        assert!(quality["missing"].as_array().unwrap().is_empty());

        let json_export: Value = server.get(&format!("/api/srs/{}", id)).await.json();
        assert!(json_export["final_srs"]["functional_requirements"].is_array());

        let markdown: Value = server
            .get(&format!("/api/srs/{}?format=markdown", id))
            .await
            .json();
        assert!(markdown["final_srs"].as_str().unwrap().starts_with("# "));
    }

    #[tokio::test]
    async fn test_status_and_reset() {
        let server = make_server();
        let id = start(&server).await;

        let status: Value = server
            .get(&format!("/api/session/{}/status", id))
            .await
            .json();
        assert_eq!(status["phase"], "gathering");
        assert_eq!(status["iteration_count"], 1);

        let response = server.post(&format!("/api/session/{}/reset", id)).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "session reset");

        server
            .get(&format!("/api/session/{}/status", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_srs_rejects_unknown_format() {
        let server = make_server();
        let id = start(&server).await;

        let response = server.get(&format!("/api/srs/{}?format=pdf", id)).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let pending: Value = server.get(&format!("/api/srs/{}", id)).await.json();
        assert!(pending["final_srs"].is_null());
        assert_eq!(pending["is_complete"], false);
    }

    #[tokio::test]
    async fn test_file_backed_listing() {
        let dir = tempdir().unwrap();
        let service = SessionService::new(
            Arc::new(FileSessionStore::new(dir.path())),
            Workflow::stub(10),
        );
        let server =
            TestServer::new(create_router(AppState::new(ApiConfig::default(), service))).unwrap();

        let id = start(&server).await;
        let list: Value = server.get("/api/sessions").await.json();
        assert_eq!(list["total"], 1);
        assert_eq!(list["sessions"][0], id.as_str());
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let server = make_server();
        let response = server
            .get("/health")
            .add_header(
                axum::http::header::ORIGIN,
                HeaderValue::from_static("http://localhost:8501"),
            )
            .await;
        assert!(response.headers().contains_key("access-control-allow-origin"));
    }
}
