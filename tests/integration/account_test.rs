//! Integration tests for registration, login, activation and password reset.

mod helpers;

use http::StatusCode;
use serde_json::json;

use agora_entity::user::RoleLevel;

#[tokio::test]
async fn test_register_then_activate() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "username": "newbie",
                "email": "newbie@example.com",
                "password": "correct horse 42",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["data"]["is_active"], false);
    assert_eq!(response.body["data"]["role_level"], 1);

    let token = app.mailer.last_activation_token().unwrap();
    let response = app
        .request("POST", &format!("/api/auth/activate?token={token}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["is_active"], true);

    let response = app
        .request("POST", &format!("/api/auth/activate?token={token}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.reason(), "already_active");
}

#[tokio::test]
async fn test_register_conflicts_and_validation() {
    let app = helpers::TestApp::new();
    app.create_user("taken", RoleLevel::Normal).await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "username": "TAKEN",
                "email": "fresh@example.com",
                "password": "password123",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.reason(), "username_taken");

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "username": "fresh",
                "email": "fresh@example.com",
                "password": "short1",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.reason(), "password_too_short");

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "username": "fresh",
                "email": "fresh@@example.com",
                "password": "password123",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.reason(), "invalid_request");

    let response = app
        .request("POST", "/api/auth/register", Some(json!({ "username": "x" })), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert_eq!(response.reason(), "invalid_body");
}

#[tokio::test]
async fn test_activation_token_is_not_a_reset_token() {
    let app = helpers::TestApp::new();
    let user = app.create_user("victim", RoleLevel::Normal).await;
    app.update_user(user.id, |u| u.is_active = false).await;

    let response = app
        .request(
            "POST",
            "/api/auth/activation",
            Some(json!({ "email": "victim@test.com" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);
    let token = app.mailer.last_activation_token().unwrap();

    let response = app
        .request(
            "POST",
            "/api/auth/password/reset",
            Some(json!({ "token": token, "new_password": "another pass 9" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), "invalid_token");
}

#[tokio::test]
async fn test_login_with_credentials_sets_cookies() {
    let app = helpers::TestApp::new();
    let user = app
        .create_user_with_password("ada", "lovelace1815", RoleLevel::Normal)
        .await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "ada", "password": "lovelace1815" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["user"]["id"], user.id.to_string());
    assert!(response.body["data"]["access_expires_at"].is_string());
    assert!(response.cookie_value("access_token").is_some());
    assert!(response.cookie_value("refresh_token").is_some());

    // Logging in again with the session cookies reissues nothing.
    let again = app
        .request("POST", "/api/auth/login", None, Some(&response.cookie_header()))
        .await;
    assert_eq!(again.status, StatusCode::OK);
    assert!(again.set_cookies().is_empty());
    assert!(again.body["data"]["access_expires_at"].is_null());
}

#[tokio::test]
async fn test_login_failures() {
    let app = helpers::TestApp::new();
    app.create_user_with_password("ada", "lovelace1815", RoleLevel::Normal)
        .await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ada@test.com", "password": "wrong-password1" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), "invalid_credentials");

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "nobody", "password": "whatever123" })),
            None,
        )
        .await;
    assert_eq!(response.reason(), "invalid_credentials");

    let response = app.request("POST", "/api/auth/login", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), "credentials_required");
}

#[tokio::test]
async fn test_login_via_refresh_cookie_rotates() {
    let app = helpers::TestApp::new();
    let user = app.create_user("grace", RoleLevel::Normal).await;

    let response = app
        .request("POST", "/api/auth/login", None, Some(&app.refresh_cookie(user.id)))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.set_cookies().len(), 2);
    assert!(response.body["data"]["refresh_expires_at"].is_string());
}

#[tokio::test]
async fn test_password_reset_flow() {
    let app = helpers::TestApp::new();
    let user = app
        .create_user_with_password("alan", "enigma1912", RoleLevel::Normal)
        .await;

    let response = app
        .request(
            "POST",
            "/api/auth/password/forgot",
            Some(json!({ "email": "nobody@test.com" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert!(app.mailer.sent().is_empty());

    let response = app
        .request(
            "POST",
            "/api/auth/password/forgot",
            Some(json!({ "email": "alan@test.com" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);
    let token = app.mailer.last_reset_token().unwrap();

    let response = app
        .request(
            "POST",
            "/api/auth/password/reset",
            Some(json!({ "token": token, "new_password": "bombe1940x" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let stored = app.users.get(user.id).await.unwrap();
    assert_ne!(stored.password_hash, user.password_hash);

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "alan", "password": "bombe1940x" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}
