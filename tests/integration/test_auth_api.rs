use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::Duration;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::crm_integration_utils::{build_router, wednesday, TestApp, LOGIN, PASSWORD};

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::spawn().await;

    let response = app.server.get("/api/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_cors_preflight() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(dir.path(), &wednesday()).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/students")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_protected_routes_require_a_session() {
    let app = TestApp::spawn().await;

    app.server
        .get("/api/students")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get("/api/students")
        .authorization_bearer("not-a-token")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "AuthenticationError");
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = TestApp::spawn().await;

    let wrong_password = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "login": LOGIN, "password": "nope" }))
        .await;
    wrong_password.assert_status(StatusCode::UNAUTHORIZED);

    let wrong_login = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "login": "admin", "password": PASSWORD }))
        .await;
    wrong_login.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_header_data() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let response = app.server.get("/api/auth/me").authorization_bearer(&token).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["roleName"], "Administradora");
    assert_eq!(body["unreadNotifications"], 1);
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    app.server
        .post("/api/auth/logout")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .get("/api/auth/me")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signing_in_again_does_not_revive_old_token() {
    let app = TestApp::spawn().await;
    let old_token = app.login().await;

    app.server
        .post("/api/auth/logout")
        .authorization_bearer(&old_token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    // The clock is frozen, so both logins share the same second
    let new_token = app.login().await;
    assert_ne!(old_token, new_token);

    app.server
        .get("/api/auth/me")
        .authorization_bearer(&old_token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .get("/api/auth/me")
        .authorization_bearer(&new_token)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_token_expires() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    app.time.advance(Duration::hours(12));

    app.server
        .get("/api/auth/me")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_update() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let response = app
        .server
        .put("/api/auth/me")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Carmen Ruiz" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["name"], "Carmen Ruiz");
    assert_eq!(body["email"], "directora@autoescuelalaroca.com");

    app.server
        .put("/api/auth/me")
        .authorization_bearer(&token)
        .json(&json!({ "email": "sin-arroba" }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_password_change() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let change = |current: &str, new: &str, confirm: &str| {
        json!({ "currentPassword": current, "newPassword": new, "confirmPassword": confirm })
    };

    app.server
        .put("/api/auth/password")
        .authorization_bearer(&token)
        .json(&change("wrong", "nueva-clave", "nueva-clave"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .put("/api/auth/password")
        .authorization_bearer(&token)
        .json(&change(PASSWORD, "nueva-clave", "otra-clave"))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    app.server
        .put("/api/auth/password")
        .authorization_bearer(&token)
        .json(&change(PASSWORD, "nueva-clave", "nueva-clave"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .post("/api/auth/login")
        .json(&json!({ "login": LOGIN, "password": PASSWORD }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.login_with("nueva-clave").await;
}
