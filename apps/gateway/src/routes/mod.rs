pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat;
use crate::features::handlers as features;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Assistant panel
        .route("/api/v1/chat", post(features::handle_chat))
        .route("/api/v1/chat/sessions", post(chat::handle_create_session))
        .route(
            "/api/v1/chat/sessions/:id",
            get(chat::handle_get_session).delete(chat::handle_delete_session),
        )
        .route(
            "/api/v1/chat/sessions/:id/messages",
            post(chat::handle_send_message),
        )
        .route(
            "/api/v1/chat/sessions/:id/messages/:message_id/copy",
            post(chat::handle_copy_message),
        )
        // Analysis panels
        .route(
            "/api/v1/decisions/analyze",
            post(features::handle_analyze_decision),
        )
        .route(
            "/api/v1/documents/analyze",
            post(features::handle_analyze_document),
        )
        .route(
            "/api/v1/documents/upload",
            post(features::handle_upload_document),
        )
        .route(
            "/api/v1/reports/analyze",
            post(features::handle_analyze_report),
        )
        .route("/api/v1/learning-plans", post(features::handle_learning_plan))
        .route("/api/v1/cv/optimize", post(features::handle_optimize_cv))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::features::test_support::{facade_for, unreachable_facade};
    use crate::features::FeatureFacade;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app(facade: FeatureFacade) -> Router {
        let config = Config::from_lookup(|_| None).unwrap();
        build_router(AppState::new(config, facade))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart(uri: &str, file_name: &str, content_type: &str, data: &str) -> Request<Body> {
        let boundary = "gateway-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n\
             {data}\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_health_reports_fallback_mode() {
        let app = app(unreachable_facade(true));
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["fallbackToSimulated"], true);
        assert_eq!(body["chatSessions"], 0);
        assert!(body.get("fallback_to_simulated").is_none());
    }

    #[tokio::test]
    async fn test_chat_session_round_trip_with_simulated_reply() {
        let app = app(unreachable_facade(true));

        let (status, created) = send(&app, post_json("/api/v1/chat/sessions", json!({}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["state"], "idle");
        assert_eq!(created["suggestedPrompts"].as_array().unwrap().len(), 4);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, outcome) = send(
            &app,
            post_json(
                &format!("/api/v1/chat/sessions/{id}/messages"),
                json!({ "content": "Explain microservices" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["status"], "replied");
        assert_eq!(outcome["userMessage"]["content"], "Explain microservices");
        assert_eq!(
            outcome["assistantMessage"]["content"],
            "Simulated response to: \"Explain microservices...\""
        );

        let request = Request::get(format!("/api/v1/chat/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (_, snapshot) = send(&app, request).await;
        assert_eq!(snapshot["messages"].as_array().unwrap().len(), 2);
        assert!(snapshot.get("suggestedPrompts").is_none());
    }

    #[tokio::test]
    async fn test_blank_send_is_ignored_not_rejected() {
        let app = app(unreachable_facade(true));
        let (_, created) = send(&app, post_json("/api/v1/chat/sessions", json!({}))).await;
        let id = created["id"].as_str().unwrap();

        let (status, outcome) = send(
            &app,
            post_json(
                &format!("/api/v1/chat/sessions/{id}/messages"),
                json!({ "content": "   " }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["status"], "ignored");
        assert_eq!(outcome["reason"], "blank_input");
    }

    #[tokio::test]
    async fn test_copy_sets_indicator_for_assistant_message() {
        let app = app(unreachable_facade(true));
        let (_, created) = send(&app, post_json("/api/v1/chat/sessions", json!({}))).await;
        let id = created["id"].as_str().unwrap().to_string();
        let (_, outcome) = send(
            &app,
            post_json(
                &format!("/api/v1/chat/sessions/{id}/messages"),
                json!({ "content": "hello" }),
            ),
        )
        .await;
        let assistant_id = outcome["assistantMessage"]["id"].as_str().unwrap().to_string();
        let user_id = outcome["userMessage"]["id"].as_str().unwrap().to_string();

        let (status, copied) = send(
            &app,
            post_json(
                &format!("/api/v1/chat/sessions/{id}/messages/{assistant_id}/copy"),
                json!({}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(copied["messageId"], assistant_id.as_str());

        let request = Request::get(format!("/api/v1/chat/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (_, snapshot) = send(&app, request).await;
        assert_eq!(snapshot["copiedMessageId"], assistant_id.as_str());

        let (status, _) = send(
            &app,
            post_json(
                &format!("/api/v1/chat/sessions/{id}/messages/{user_id}/copy"),
                json!({}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_deleted_session_is_gone() {
        let app = app(unreachable_facade(true));
        let (_, created) = send(&app, post_json("/api/v1/chat/sessions", json!({}))).await;
        let id = created["id"].as_str().unwrap().to_string();

        let delete = Request::delete(format!("/api/v1/chat/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, delete).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let get = Request::get(format!("/api/v1/chat/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, get).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    struct PanickingAssistant;

    #[async_trait::async_trait]
    impl crate::chat::Assistant for PanickingAssistant {
        async fn reply(
            &self,
            _history: &[crate::models::message::ChatTurn],
        ) -> Result<crate::features::chat::AiResponse, crate::features::FeatureError> {
            panic!("assistant blew up");
        }
    }

    #[tokio::test]
    async fn test_crashed_reply_is_internal_error_and_frees_session() {
        let config = Config::from_lookup(|_| None).unwrap();
        let mut state = AppState::new(config, unreachable_facade(true));
        state.assistant = std::sync::Arc::new(PanickingAssistant);
        let app = build_router(state);

        let (_, created) = send(&app, post_json("/api/v1/chat/sessions", json!({}))).await;
        let id = created["id"].as_str().unwrap().to_string();
        let uri = format!("/api/v1/chat/sessions/{id}/messages");

        let (status, body) = send(&app, post_json(&uri, json!({ "content": "hello" }))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");

        let request = Request::get(format!("/api/v1/chat/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (_, snapshot) = send(&app, request).await;
        assert_eq!(snapshot["state"], "idle");
        assert_eq!(snapshot["notification"], "AI response failed");
    }

    #[tokio::test]
    async fn test_blank_problem_is_rejected_before_webhook() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let app = app(facade_for(&server, true));

        let (status, body) = send(
            &app,
            post_json("/api/v1/decisions/analyze", json!({ "problem": " " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_text_inputs_are_forwarded_trimmed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/decision"))
            .and(body_json(json!({ "problem": "Adopt Rust?" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pros": ["Safety"],
                "cons": ["Learning curve"],
                "risks": ["Hiring"],
                "benefits": ["Fewer crashes"],
                "recommendation": "Pilot one service.",
                "confidence": 70
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/document"))
            .and(body_json(json!({ "content": "ship it" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "summary": "Short note.",
                "keyPoints": [],
                "actionItems": [],
                "sentiment": "positive",
                "wordCount": 2,
                "readingTime": "1 min"
            })))
            .expect(1)
            .mount(&server)
            .await;
        // Fallback off: an untrimmed body would miss the mocks and surface as 502.
        let app = app(facade_for(&server, false));

        let (status, body) = send(
            &app,
            post_json("/api/v1/decisions/analyze", json!({ "problem": "  Adopt Rust? \n" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["confidence"], 70);

        let (status, _) = send(
            &app,
            post_json("/api/v1/documents/analyze", json!({ "content": "\tship it  " })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_every_feature_answers_when_webhooks_are_down() {
        let app = app(unreachable_facade(true));

        let (status, body) = send(
            &app,
            post_json("/api/v1/decisions/analyze", json!({ "problem": "Adopt Rust?" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["confidence"], 85);

        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/documents/analyze",
                json!({ "content": "four words right here" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["wordCount"], 4);
        assert_eq!(body["readingTime"], "1 min");

        let (status, body) = send(
            &app,
            post_json("/api/v1/learning-plans", json!({ "skill": "Rust" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["skill"], "Rust");

        let (status, body) = send(
            &app,
            post_json("/api/v1/cv/optimize", json!({ "cvData": { "name": "Ada" } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["atsScore"], 75);

        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/chat",
                json!({ "messages": [{ "role": "user", "content": "Explain microservices" }] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model"], "gemini");

        let (status, body) = send(
            &app,
            multipart("/api/v1/reports/analyze", "q3.csv", "text/csv", "region,revenue"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["highlights"][0]["title"], "Revenue");

        let (status, body) = send(
            &app,
            multipart("/api/v1/documents/upload", "notes.txt", "text/plain", "ship it"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["wordCount"], 2);
    }

    #[tokio::test]
    async fn test_webhook_failure_is_bad_gateway_without_fallback() {
        let app = app(unreachable_facade(false));

        let (status, body) = send(
            &app,
            post_json("/api/v1/learning-plans", json!({ "skill": "Rust" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "WEBHOOK_ERROR");
    }

    #[tokio::test]
    async fn test_cv_data_must_be_object() {
        let app = app(unreachable_facade(true));
        let (status, _) = send(
            &app,
            post_json("/api/v1/cv/optimize", json!({ "cvData": "plain text" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
