use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use tokio::sync::Mutex;
use url::Url;

use leadmachine_auth::config::EmailJsConfig;
use leadmachine_auth::handlers::session::SESSION_COOKIE;
use leadmachine_auth::router::build_router;
use leadmachine_auth::state::AppState;
use leadmachine_auth::usecase::session::issue_session_token;

use crate::helpers::TEST_JWT_SECRET;

/// State wired to unreachable backends: Redis never answers (so the history
/// degrades to empty) and the mail endpoint refuses connections.
fn offline_state() -> AppState {
    let redis = deadpool_redis::Config::from_url("redis://127.0.0.1:6399")
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .unwrap();

    AppState {
        redis,
        history_lock: Arc::new(Mutex::new(())),
        http: reqwest::Client::new(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        cookie_domain: "example.com".to_owned(),
        app_origin: Url::parse("https://crm.example.com").unwrap(),
        sender_email: "admin@example.com".to_owned(),
        emailjs: EmailJsConfig {
            service_id: "service_test".to_owned(),
            template_id: "template_test".to_owned(),
            public_key: "public_key_test".to_owned(),
            api_url: "http://127.0.0.1:9/api/v1.0/email/send".to_owned(),
        },
    }
}

fn server() -> TestServer {
    TestServer::new(build_router(offline_state())).unwrap()
}

#[tokio::test]
async fn should_answer_health_probes() {
    let server = server();
    server.get("/healthz").await.assert_status(StatusCode::OK);
    server.get("/readyz").await.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn should_reject_a_malformed_email_with_400() {
    let server = server();
    let response = server
        .post("/auth/code")
        .json(&serde_json::json!({ "email": "not-an-email" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "INVALID_EMAIL");
}

#[tokio::test]
async fn should_report_delivery_failure_with_502() {
    let server = server();
    let response = server
        .post("/auth/code")
        .json(&serde_json::json!({ "email": "lead@example.com" }))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "DELIVERY_FAILED");
}

#[tokio::test]
async fn should_list_an_empty_history_when_redis_is_away() {
    let server = server();
    let response = server.get("/auth/codes?email=lead@example.com").await;
    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn should_purge_nothing_when_redis_is_away() {
    let server = server();
    let response = server.delete("/auth/codes/expired").await;
    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["removed"], 0);
}

#[tokio::test]
async fn should_reject_login_with_401_when_no_code_matches() {
    let server = server();
    let response = server
        .post("/auth/session")
        .json(&serde_json::json!({ "email": "lead@example.com", "code": "123456" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "INVALID_ACCESS_CODE");
}

#[tokio::test]
async fn should_reject_session_check_without_cookie() {
    let server = server();
    let response = server.get("/auth/session").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "INVALID_SESSION");
}

#[tokio::test]
async fn should_report_the_session_from_a_valid_cookie() {
    let server = server();
    let (token, exp) = issue_session_token("lead@example.com", TEST_JWT_SECRET).unwrap();

    let response = server
        .get("/auth/session")
        .add_header(
            axum::http::header::COOKIE,
            axum::http::HeaderValue::from_str(&format!("{SESSION_COOKIE}={token}")).unwrap(),
        )
        .await;

    response.assert_status(StatusCode::OK);
    let expires = response
        .headers()
        .get("x-leadmachine-session-expires")
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();
    assert_eq!(expires, exp.to_string());

    let body: serde_json::Value = response.json();
    assert_eq!(body["email"], "lead@example.com");
    assert_eq!(body["session_exp"], exp);
}

#[tokio::test]
async fn should_clear_the_session_cookie_on_logout() {
    let server = server();
    let response = server.delete("/auth/session").await;
    response.assert_status(StatusCode::NO_CONTENT);

    let set_cookie = response
        .headers()
        .get(axum::http::header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();
    assert!(set_cookie.starts_with(SESSION_COOKIE));
    assert!(set_cookie.contains("Max-Age=0"));
}
