//! Integration tests for the auth routes

mod common;

use axum::http::{header, HeaderValue};
use serde_json::{json, Value};

use common::{bearer, spawn_app, SEED_USERS};

#[tokio::test]
async fn login_succeeds_with_valid_credentials() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/login")
        .json(&json!({ "username": "grace", "password": "hopper123" }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["user"]["username"], "grace");
    assert!(!body["token"].as_str().unwrap().is_empty());

    // Session cookie is set httpOnly
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn login_fails_with_wrong_password() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/login")
        .json(&json!({ "username": "grace", "password": "wrong" }))
        .await;
    assert_eq!(response.status_code(), 401);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn login_fails_for_unknown_user() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/login")
        .json(&json!({ "username": "nobody", "password": "hopper123" }))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn me_returns_the_current_user() {
    let app = spawn_app().await;
    let token = app.login_default().await;

    let response = app
        .server
        .get("/me")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["username"], SEED_USERS[0].0);
}

#[tokio::test]
async fn me_rejects_guests() {
    let app = spawn_app().await;

    let response = app.server.get("/me").await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn session_works_via_cookie() {
    let app = spawn_app().await;
    let token = app.login_default().await;

    let response = app
        .server
        .get("/me")
        .add_header(
            header::COOKIE,
            HeaderValue::from_str(&format!("session={}", token)).unwrap(),
        )
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn logout_clears_the_session() {
    let app = spawn_app().await;
    let token = app.login_default().await;

    let response = app
        .server
        .delete("/logout")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(response.status_code(), 204);

    // The token is gone server-side
    let me = app
        .server
        .get("/me")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(me.status_code(), 401);
}

#[tokio::test]
async fn logout_rejects_guests() {
    let app = spawn_app().await;

    let response = app.server.delete("/logout").await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn two_users_hold_independent_sessions() {
    let app = spawn_app().await;
    let grace = app.login("grace", "hopper123").await;
    let ada = app.login("ada", "lovelace123").await;

    app.server
        .delete("/logout")
        .add_header(header::AUTHORIZATION, bearer(&grace))
        .await;

    // Ada's session survives Grace's logout
    let me = app
        .server
        .get("/me")
        .add_header(header::AUTHORIZATION, bearer(&ada))
        .await;
    assert_eq!(me.status_code(), 200);

    let body: Value = me.json();
    assert_eq!(body["username"], "ada");
}
