use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use nimbus_api::{build_router, AppState};
use nimbus_infrastructure::InMemoryUserRepository;
use nimbus_shared::config::AppConfig;
use serde_json::Value;
use tower::ServiceExt;

// Helper to create a router over an in-memory store
fn test_state(repo: InMemoryUserRepository) -> AppState {
    let mut config = AppConfig::defaults().unwrap();
    config.diagnostics.enabled = true;
    config.diagnostics.allowed_programs = vec!["echo".to_string()];
    config.diagnostics.allowed_args =
        [("echo".to_string(), vec!["hi".to_string()])].into_iter().collect();
    AppState::with_repository(config, Arc::new(repo))
}

fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// `session=<token>` from a Set-Cookie header.
fn session_pair(response: &axum::response::Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register_ann(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(form_post(
            "/api/v1/auth/register",
            "firstName=Ann&lastName=Lee&email=Ann%40X.com&password=longenough1",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    session_pair(&response)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_router(test_state(InMemoryUserRepository::new()));
    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_sets_cookie_and_redirects() {
    let app = build_router(test_state(InMemoryUserRepository::new()));
    let response = app
        .oneshot(form_post(
            "/api/v1/auth/register",
            "firstName=Ann&lastName=Lee&email=Ann%40X.com&password=longenough1",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/dashboard");
    let set_cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.starts_with("session="));
    assert!(set_cookie.contains("Max-Age=604800"));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(!set_cookie.contains("Secure"));
}

#[tokio::test]
async fn test_register_on_read_only_store_still_signs_in() {
    let app = build_router(test_state(InMemoryUserRepository::read_only()));
    let cookie = register_ann(&app).await;

    let response = app.oneshot(get("/api/v1/auth/me", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["email"], "ann@x.com");
}

#[tokio::test]
async fn test_register_validation_error() {
    let app = build_router(test_state(InMemoryUserRepository::new()));
    let response = app
        .oneshot(form_post(
            "/api/v1/auth/register",
            "firstName=Ann&lastName=Lee&email=ann%40x.com&password=short",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "Password must be at least 8 characters");
}

#[tokio::test]
async fn test_me_projection() {
    let app = build_router(test_state(InMemoryUserRepository::new()));
    let cookie = register_ann(&app).await;

    let response = app.oneshot(get("/api/v1/auth/me", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let data = &body["data"];
    assert_eq!(data["email"], "ann@x.com");
    assert_eq!(data["firstName"], "Ann");
    assert_eq!(data["lastName"], "Lee");
    assert!(data["company"].is_null());
    assert!(data.get("password").is_none());
}

#[tokio::test]
async fn test_me_without_cookie_is_unauthorized() {
    let app = build_router(test_state(InMemoryUserRepository::new()));
    let response = app.oneshot(get("/api/v1/auth/me", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let app = build_router(test_state(InMemoryUserRepository::new()));
    register_ann(&app).await;

    let wrong_password = app
        .clone()
        .oneshot(form_post("/api/v1/auth/login", "email=ann%40x.com&password=nope", None))
        .await
        .unwrap();
    let unknown_email = app
        .clone()
        .oneshot(form_post("/api/v1/auth/login", "email=who%40x.com&password=nope", None))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    let a = json_body(wrong_password).await;
    let b = json_body(unknown_email).await;
    assert_eq!(a["error"]["message"], b["error"]["message"]);
    assert_eq!(a["error"]["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_case_insensitive() {
    let app = build_router(test_state(InMemoryUserRepository::new()));
    register_ann(&app).await;

    let response = app
        .oneshot(form_post(
            "/api/v1/auth/login",
            "email=ANN%40X.COM&password=longenough1",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/dashboard");
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = build_router(test_state(InMemoryUserRepository::new()));
    let cookie = register_ann(&app).await;

    let response = app
        .clone()
        .oneshot(form_post("/api/v1/auth/logout", "", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    let set_cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=0"));

    let response = app.oneshot(get("/api/v1/auth/me", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_status_check_requires_session() {
    let app = build_router(test_state(InMemoryUserRepository::new()));
    let response = app
        .oneshot(form_post("/api/v1/status/check", "cmd=echo+hi", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_status_check_reports_on_success_path() {
    let app = build_router(test_state(InMemoryUserRepository::new()));
    let cookie = register_ann(&app).await;

    let response = app
        .clone()
        .oneshot(form_post("/api/v1/status/check", "cmd=echo+hi", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["output"], "hi");
    assert_eq!(body["data"]["exit_code"], 0);

    let response = app
        .clone()
        .oneshot(form_post("/api/v1/status/check", "cmd=id", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Allowed program, argument outside its list.
    let response = app
        .oneshot(form_post("/api/v1/status/check", "cmd=echo+bye", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
