//! Integration tests for the Moodcheck API.
//!
//! Each test builds its own router over a fresh orchestrator backed by the
//! deterministic `MockGenerator`, and drives it with `oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use moodcheck_api::create_router;
use moodcheck_api::error::ErrorBody;
use moodcheck_api::handlers::{HealthResponse, PhqResponse, StatusResponse};
use moodcheck_api::state::AppState;
use moodcheck_core::MoodcheckConfig;
use moodcheck_screening::questionnaire::{COMPLETED_MESSAGE, QUESTIONS, QUESTION_COUNT};
use moodcheck_screening::{
    Confirmations, FirstPicker, MockGenerator, PromptKind, ReplySource, ResponseClassifier,
    ScreeningConfig, ScreeningOrchestrator,
};

// =============================================================================
// Helpers
// =============================================================================

fn make_state_with(mock: Arc<MockGenerator>, config: MoodcheckConfig) -> AppState {
    let orchestrator = ScreeningOrchestrator::with_components(
        ResponseClassifier::new(mock),
        Confirmations::new(FirstPicker),
        ScreeningConfig::from(&config),
    );
    AppState::new(config, Arc::new(orchestrator))
}

fn make_app_with(mock: Arc<MockGenerator>) -> axum::Router {
    create_router(make_state_with(mock, MoodcheckConfig::default()))
}

fn make_app() -> axum::Router {
    make_app_with(Arc::new(MockGenerator::new().with_label("Several days")))
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

fn phq_body(text: &str, session_id: Option<Uuid>) -> String {
    match session_id {
        Some(id) => serde_json::json!({ "user_response": text, "session_id": id }).to_string(),
        None => serde_json::json!({ "user_response": text }).to_string(),
    }
}

/// Read full response body bytes.
async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

async fn send_phq(app: &axum::Router, text: &str, session_id: Option<Uuid>) -> PhqResponse {
    let resp = app
        .clone()
        .oneshot(post_json("/phq", &phq_body(text, session_id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

// =============================================================================
// GET /health
// =============================================================================

#[tokio::test]
async fn test_health_happy_path() {
    let app = make_app();
    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let health: HealthResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, "0.1.0");
    assert_eq!(health.active_sessions, 0);
}

#[tokio::test]
async fn test_health_counts_sessions() {
    let app = make_app();
    send_phq(&app, "start", None).await;
    send_phq(&app, "start", None).await;

    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let health: HealthResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(health.active_sessions, 2);
}

// =============================================================================
// POST /phq
// =============================================================================

#[tokio::test]
async fn test_phq_idle_companion_reply() {
    let app = make_app();
    let reply = send_phq(&app, "hello there", None).await;
    assert_eq!(reply.source, ReplySource::Companion);
    assert!(!reply.is_final);
    assert!(!reply.is_high_risk);
    assert!(reply.use_browser_tts);
}

#[tokio::test]
async fn test_phq_start_phrase_asks_first_question() {
    let app = make_app();
    let reply = send_phq(&app, "  Start the assessment  ", None).await;
    assert_eq!(reply.response, QUESTIONS[0]);
    assert_eq!(reply.source, ReplySource::Assessment);
}

#[tokio::test]
async fn test_phq_full_assessment() {
    let app = make_app();
    let first = send_phq(&app, "start", None).await;
    let sid = first.session_id;

    let mut last = first;
    for n in 0..QUESTION_COUNT {
        last = send_phq(&app, "a few days I guess", Some(sid)).await;
        assert_eq!(last.session_id, sid);
        if n + 1 < QUESTION_COUNT {
            assert!(!last.is_final);
            assert!(last.response.ends_with(QUESTIONS[n + 1]));
        }
    }

    assert!(last.is_final);
    assert_eq!(last.total_score, Some(9));
    assert!(last.response.contains("Final message:"));
    assert!(last.final_message.is_some());

    let after = send_phq(&app, "what now", Some(sid)).await;
    assert_eq!(after.response, COMPLETED_MESSAGE);
}

#[tokio::test]
async fn test_phq_high_risk_flag() {
    let app = make_app();
    let sid = send_phq(&app, "start", None).await.session_id;
    let reply = send_phq(&app, "every day, I keep thinking I want to die", Some(sid)).await;
    assert!(reply.is_high_risk);
    assert!(!reply.is_final);
}

#[tokio::test]
async fn test_phq_crisis_note_from_config() {
    let mut config = MoodcheckConfig::default();
    config.risk.crisis_note = Some("Help is available.".to_string());
    let app = create_router(make_state_with(Arc::new(MockGenerator::new()), config));

    let sid = send_phq(&app, "start", None).await.session_id;
    let reply = send_phq(&app, "I want to end my life", Some(sid)).await;
    assert!(reply.is_high_risk);
    assert!(reply.response.ends_with("Help is available."));
}

#[tokio::test]
async fn test_phq_empty_message_bad_request() {
    let app = make_app();
    let resp = app
        .oneshot(post_json("/phq", &phq_body("   ", None)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body.error, "bad_request");
}

#[tokio::test]
async fn test_phq_too_long_bad_request() {
    let app = make_app();
    let long = "x".repeat(2001);
    let resp = app
        .oneshot(post_json("/phq", &phq_body(&long, None)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_phq_missing_field_rejected() {
    let app = make_app();
    let resp = app
        .oneshot(post_json("/phq", r#"{"text": "hi"}"#))
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn test_phq_backend_failure_service_unavailable() {
    let mock = Arc::new(MockGenerator::new());
    let app = make_app_with(Arc::clone(&mock));
    let sid = send_phq(&app, "start", None).await.session_id;

    mock.fail_on(PromptKind::Classification);
    let resp = app
        .clone()
        .oneshot(post_json("/phq", &phq_body("some days", Some(sid))))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: ErrorBody = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body.error, "service_unavailable");
    assert!(!body.message.contains("mock failure"));

    mock.recover();
    let reply = send_phq(&app, "some days", Some(sid)).await;
    assert!(reply.response.ends_with(QUESTIONS[1]));
}

// =============================================================================
// POST /phq/start and /phq/reset
// =============================================================================

#[tokio::test]
async fn test_start_endpoint_new_session() {
    let app = make_app();
    let resp = app.oneshot(post_json("/phq/start", "{}")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let reply: PhqResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(reply.response, QUESTIONS[0]);
}

#[tokio::test]
async fn test_start_endpoint_restarts_existing_session() {
    let app = make_app();
    let sid = send_phq(&app, "start", None).await.session_id;
    send_phq(&app, "answer", Some(sid)).await;

    let body = serde_json::json!({ "session_id": sid }).to_string();
    let resp = app
        .clone()
        .oneshot(post_json("/phq/start", &body))
        .await
        .unwrap();
    let reply: PhqResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(reply.session_id, sid);
    assert_eq!(reply.response, QUESTIONS[0]);

    let resp = app
        .oneshot(
            Request::get(format!("/phq/sessions/{}", sid))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let progress: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(progress["current_index"], 0);
    assert_eq!(progress["answered"], 0);
}

#[tokio::test]
async fn test_reset_endpoint() {
    let app = make_app();
    let sid = send_phq(&app, "start", None).await.session_id;
    send_phq(&app, "answer", Some(sid)).await;

    let body = serde_json::json!({ "session_id": sid }).to_string();
    let resp = app
        .clone()
        .oneshot(post_json("/phq/reset", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let status: StatusResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(status.status, "reset");
    assert_eq!(status.session_id, sid);

    let resp = app
        .oneshot(
            Request::get(format!("/phq/sessions/{}", sid))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let progress: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(progress["phase"], "idle");
    assert_eq!(progress["started"], false);
    assert_eq!(progress["total_score"], 0);
}

#[tokio::test]
async fn test_reset_unknown_session_not_found() {
    let app = make_app();
    let body = serde_json::json!({ "session_id": Uuid::new_v4() }).to_string();
    let resp = app.oneshot(post_json("/phq/reset", &body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// /phq/sessions
// =============================================================================

#[tokio::test]
async fn test_list_sessions() {
    let app = make_app();
    send_phq(&app, "start", None).await;
    send_phq(&app, "hi", None).await;

    let resp = app
        .oneshot(Request::get("/phq/sessions").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(json["total"], 2);
    assert_eq!(json["sessions"].as_array().unwrap().len(), 2);
    assert_eq!(json["sessions"][0]["turn_count"], 1);
}

#[tokio::test]
async fn test_get_session_progress() {
    let app = make_app();
    let sid = send_phq(&app, "start", None).await.session_id;
    send_phq(&app, "answer", Some(sid)).await;
    send_phq(&app, "answer", Some(sid)).await;

    let resp = app
        .oneshot(
            Request::get(format!("/phq/sessions/{}", sid))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(json["phase"], "in_progress");
    assert_eq!(json["index"], 2);
    assert_eq!(json["total_score"], 2);
    assert_eq!(json["answered"], 2);
}

#[tokio::test]
async fn test_get_session_not_found() {
    let app = make_app();
    let resp = app
        .oneshot(
            Request::get(format!("/phq/sessions/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body.error, "not_found");
}

#[tokio::test]
async fn test_get_session_invalid_uuid() {
    let app = make_app();
    let resp = app
        .oneshot(
            Request::get("/phq/sessions/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_session() {
    let app = make_app();
    let sid = send_phq(&app, "start", None).await.session_id;

    let delete = || {
        Request::delete(format!("/phq/sessions/{}", sid))
            .body(Body::empty())
            .unwrap()
    };
    let resp = app.clone().oneshot(delete()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let status: StatusResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(status.status, "deleted");

    let resp = app.oneshot(delete()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Routing and CORS
// =============================================================================

#[tokio::test]
async fn test_unknown_route_not_found() {
    let app = make_app();
    let resp = app
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let app = make_app();
    let resp = app
        .oneshot(
            Request::get("/health")
                .header("origin", "http://localhost:8000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:8000")
    );
}

#[tokio::test]
async fn test_cors_rejects_other_origin() {
    let app = make_app();
    let resp = app
        .oneshot(
            Request::get("/health")
                .header("origin", "http://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(resp.headers().get("access-control-allow-origin").is_none());
}
