//! Integration tests for cookie session resolution and rotation.

mod helpers;

use chrono::{Duration, Utc};
use http::StatusCode;
use uuid::Uuid;

use agora_auth::token::TokenClass;
use agora_entity::user::RoleLevel;

#[tokio::test]
async fn test_valid_access_cookie_resolves_without_rewrite() {
    let app = helpers::TestApp::new();
    let user = app.create_user("ada", RoleLevel::Normal).await;
    let cookies = app.session_cookies(user.id);

    let response = app.request("GET", "/api/auth/me", None, Some(&cookies)).await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["id"], user.id.to_string());
    assert_eq!(response.body["data"]["username"], "ada");
    assert!(response.body["data"].get("password_hash").is_none());
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn test_refresh_cookie_rotates_both_tokens() {
    let app = helpers::TestApp::new();
    let user = app.create_user("grace", RoleLevel::Normal).await;
    let cookies = app.refresh_cookie(user.id);

    let response = app.request("GET", "/api/auth/me", None, Some(&cookies)).await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.set_cookies().len(), 2);

    let access = response.cookie_value("access_token").unwrap();
    let refresh = response.cookie_value("refresh_token").unwrap();
    let tokens = &app.state.tokens;
    assert_eq!(tokens.verify(TokenClass::Access, &access).unwrap(), user.id);
    assert_eq!(tokens.verify(TokenClass::Refresh, &refresh).unwrap(), user.id);
    assert_ne!(format!("refresh_token={refresh}"), cookies);

    let access_cookie = response.set_cookie("access_token").unwrap();
    assert!(access_cookie.contains("Max-Age=1800"));
    assert!(access_cookie.contains("HttpOnly"));
    assert!(access_cookie.contains("SameSite=Lax"));
    assert!(access_cookie.contains("Secure"));
    assert!(access_cookie.contains("Path=/"));
    let refresh_cookie = response.set_cookie("refresh_token").unwrap();
    assert!(refresh_cookie.contains("Max-Age=21600"));

    // The rotated cookies are accepted on the next request.
    let next = app
        .request("GET", "/api/auth/me", None, Some(&response.cookie_header()))
        .await;
    assert_eq!(next.status, StatusCode::OK);
    assert!(next.set_cookies().is_empty());
}

#[tokio::test]
async fn test_expired_access_falls_back_to_refresh() {
    let app = helpers::TestApp::new();
    let user = app.create_user("linus", RoleLevel::Normal).await;
    let expired = app
        .state
        .tokens
        .issue_at(TokenClass::Access, user.id, Utc::now() - Duration::hours(1))
        .unwrap();
    let cookies = format!("access_token={expired}; {}", app.refresh_cookie(user.id));

    let response = app.request("GET", "/api/auth/me", None, Some(&cookies)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.cookie_value("access_token").is_some());
    assert!(response.cookie_value("refresh_token").is_some());
}

#[tokio::test]
async fn test_access_for_unknown_user_falls_back_to_refresh() {
    let app = helpers::TestApp::new();
    let user = app.create_user("margaret", RoleLevel::Normal).await;
    let ghost = app.tokens_for(Uuid::new_v4());
    let cookies = format!(
        "access_token={}; {}",
        ghost.access_token,
        app.refresh_cookie(user.id)
    );

    let response = app.request("GET", "/api/auth/me", None, Some(&cookies)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["id"], user.id.to_string());
    assert_eq!(response.set_cookies().len(), 2);
}

#[tokio::test]
async fn test_no_cookies_is_unauthorized() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/auth/me", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
    assert_eq!(response.reason(), "unauthenticated");
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn test_bad_refresh_cookie_clears_cookies() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "GET",
            "/api/auth/me",
            None,
            Some("access_token=garbage; refresh_token=also-garbage"),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), "invalid_refresh_token");
    let cleared = response.set_cookies();
    assert_eq!(cleared.len(), 2);
    for cookie in &cleared {
        assert!(cookie.contains("Max-Age=0"), "{cookie}");
    }
    assert_eq!(response.cookie_value("access_token").as_deref(), Some(""));
    assert_eq!(response.cookie_value("refresh_token").as_deref(), Some(""));
}

#[tokio::test]
async fn test_access_token_is_not_a_refresh_token() {
    let app = helpers::TestApp::new();
    let user = app.create_user("ken", RoleLevel::Normal).await;
    let pair = app.tokens_for(user.id);

    let response = app
        .request(
            "GET",
            "/api/auth/me",
            None,
            Some(&format!("refresh_token={}", pair.access_token)),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), "invalid_refresh_token");
    assert_eq!(response.set_cookies().len(), 2);
}

#[tokio::test]
async fn test_refresh_for_unknown_user_clears_cookies() {
    let app = helpers::TestApp::new();
    let cookies = app.refresh_cookie(Uuid::new_v4());

    let response = app.request("GET", "/api/auth/me", None, Some(&cookies)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), "invalid_refresh_token");
    assert_eq!(response.set_cookies().len(), 2);
}

#[tokio::test]
async fn test_banned_beats_inactive() {
    let app = helpers::TestApp::new();
    let user = app.create_user("mallory", RoleLevel::Normal).await;
    app.update_user(user.id, |u| {
        u.banned = true;
        u.is_active = false;
    })
    .await;

    let cookies = app.session_cookies(user.id);
    let response = app.request("GET", "/api/auth/me", None, Some(&cookies)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.reason(), "account_banned");
    assert_eq!(response.body["message"], "account banned");
}

#[tokio::test]
async fn test_inactive_and_timed_out_gates() {
    let app = helpers::TestApp::new();
    let sleeper = app.create_user("sleeper", RoleLevel::Normal).await;
    app.update_user(sleeper.id, |u| u.is_active = false).await;

    let response = app
        .request("GET", "/api/auth/me", None, Some(&app.session_cookies(sleeper.id)))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.reason(), "account_not_active");

    let muted = app.create_user("muted", RoleLevel::Normal).await;
    app.update_user(muted.id, |u| {
        u.timeout_until = Some(Utc::now() + Duration::minutes(10))
    })
    .await;

    let response = app
        .request("GET", "/api/auth/me", None, Some(&app.session_cookies(muted.id)))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.reason(), "account_timeout");

    app.update_user(muted.id, |u| {
        u.timeout_until = Some(Utc::now() - Duration::minutes(1))
    })
    .await;
    let response = app
        .request("GET", "/api/auth/me", None, Some(&app.session_cookies(muted.id)))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_gate_after_rotation_writes_no_cookies() {
    let app = helpers::TestApp::new();
    let user = app.create_user("eve", RoleLevel::Normal).await;
    app.update_user(user.id, |u| u.banned = true).await;

    let response = app
        .request("GET", "/api/auth/me", None, Some(&app.refresh_cookie(user.id)))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.reason(), "account_banned");
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn test_logout_clears_cookies() {
    let app = helpers::TestApp::new();

    let response = app.request("POST", "/api/auth/logout", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let cleared = response.set_cookies();
    assert_eq!(cleared.len(), 2);
    assert!(cleared.iter().all(|c| c.contains("Max-Age=0")));
}
