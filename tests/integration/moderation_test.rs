//! Integration tests for moderation endpoints and the role policy.

mod helpers;

use chrono::{DateTime, Duration, Utc};
use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use agora_entity::user::RoleLevel;

#[tokio::test]
async fn test_moderator_times_out_normal_user() {
    let app = helpers::TestApp::new();
    let moderator = app.create_user("mod", RoleLevel::Moderator).await;
    let target = app.create_user("noisy", RoleLevel::Normal).await;

    let before = Utc::now();
    let response = app
        .request(
            "POST",
            &format!("/api/moderation/timeout/{}", target.id),
            Some(json!({ "duration": "1h" })),
            Some(&app.session_cookies(moderator.id)),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let until: DateTime<Utc> = response.body["data"]["timeout_until"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    let expected = before + Duration::hours(1);
    assert!((until - expected).num_seconds().abs() <= 5);

    let stored = app.users.get(target.id).await.unwrap();
    assert_eq!(stored.timeout_until, Some(until));

    // The timed-out user can no longer use their session.
    let response = app
        .request("GET", "/api/auth/me", None, Some(&app.session_cookies(target.id)))
        .await;
    assert_eq!(response.reason(), "account_timeout");
}

#[tokio::test]
async fn test_moderator_cannot_act_on_peer_or_admin() {
    let app = helpers::TestApp::new();
    let moderator = app.create_user("mod", RoleLevel::Moderator).await;
    let peer = app.create_user("mod2", RoleLevel::Moderator).await;
    let admin = app.create_user("root", RoleLevel::Admin).await;
    let cookies = app.session_cookies(moderator.id);

    let response = app
        .request(
            "POST",
            &format!("/api/moderation/timeout/{}", peer.id),
            Some(json!({ "duration": "15m" })),
            Some(&cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.reason(), "moderator_cannot_act_on_peer");

    let response = app
        .request(
            "POST",
            &format!("/api/moderation/deactivate/{}", admin.id),
            None,
            Some(&cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.reason(), "moderator_cannot_act_on_admin");
}

#[tokio::test]
async fn test_normal_user_cannot_moderate() {
    let app = helpers::TestApp::new();
    let user = app.create_user("pleb", RoleLevel::Normal).await;
    let other = app.create_user("other", RoleLevel::Normal).await;

    let response = app
        .request(
            "POST",
            &format!("/api/moderation/timeout/{}", other.id),
            Some(json!({ "duration": "1h" })),
            Some(&app.session_cookies(user.id)),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.reason(), "insufficient_permissions");
}

#[tokio::test]
async fn test_ban_requires_admin_and_admin_cannot_ban_admin() {
    let app = helpers::TestApp::new();
    let moderator = app.create_user("mod", RoleLevel::Moderator).await;
    let admin = app.create_user("root", RoleLevel::Admin).await;
    let other_admin = app.create_user("root2", RoleLevel::Admin).await;
    let target = app.create_user("spammer", RoleLevel::Normal).await;
    let path = format!("/api/moderation/ban/{}", target.id);

    let response = app
        .request("POST", &path, None, Some(&app.session_cookies(moderator.id)))
        .await;
    assert_eq!(response.reason(), "insufficient_permissions");

    let admin_cookies = app.session_cookies(admin.id);
    let response = app.request("POST", &path, None, Some(&admin_cookies)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["banned"], true);

    let response = app.request("POST", &path, None, Some(&admin_cookies)).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.reason(), "already_banned");

    let response = app
        .request(
            "POST",
            &format!("/api/moderation/ban/{}", other_admin.id),
            None,
            Some(&admin_cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.reason(), "admin_cannot_act_on_admin");

    let response = app
        .request(
            "POST",
            &format!("/api/moderation/unban/{}", target.id),
            None,
            Some(&admin_cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["banned"], false);
}

#[tokio::test]
async fn test_admin_reactivates_moderator() {
    let app = helpers::TestApp::new();
    let admin = app.create_user("root", RoleLevel::Admin).await;
    let moderator = app.create_user("mod", RoleLevel::Moderator).await;
    let cookies = app.session_cookies(admin.id);

    let response = app
        .request(
            "POST",
            &format!("/api/moderation/deactivate/{}", moderator.id),
            None,
            Some(&cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["is_active"], false);

    let response = app
        .request(
            "POST",
            &format!("/api/moderation/activate/{}", moderator.id),
            None,
            Some(&cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["is_active"], true);
}

#[tokio::test]
async fn test_missing_target_is_not_found() {
    let app = helpers::TestApp::new();
    let admin = app.create_user("root", RoleLevel::Admin).await;

    let response = app
        .request(
            "POST",
            &format!("/api/moderation/ban/{}", Uuid::new_v4()),
            None,
            Some(&app.session_cookies(admin.id)),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_inputs() {
    let app = helpers::TestApp::new();
    let moderator = app.create_user("mod", RoleLevel::Moderator).await;
    let target = app.create_user("noisy", RoleLevel::Normal).await;
    let cookies = app.session_cookies(moderator.id);

    let response = app
        .request(
            "POST",
            &format!("/api/moderation/timeout/{}", target.id),
            Some(json!({ "duration": "forever" })),
            Some(&cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.reason(), "invalid_duration");

    let response = app
        .request(
            "POST",
            "/api/moderation/timeout/not-a-uuid",
            Some(json!({ "duration": "1h" })),
            Some(&cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.reason(), "invalid_id");
}

#[tokio::test]
async fn test_timeout_target_and_permission_checked_before_duration() {
    let app = helpers::TestApp::new();
    let normal = app.create_user("plain", RoleLevel::Normal).await;
    let target = app.create_user("other", RoleLevel::Normal).await;
    let cookies = app.session_cookies(normal.id);

    let response = app
        .request(
            "POST",
            &format!("/api/moderation/timeout/{}", Uuid::new_v4()),
            Some(json!({ "duration": "forever" })),
            Some(&cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request(
            "POST",
            &format!("/api/moderation/timeout/{}", target.id),
            Some(json!({ "duration": "forever" })),
            Some(&cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.reason(), "insufficient_permissions");
}

#[tokio::test]
async fn test_remove_and_list_timeouts() {
    let app = helpers::TestApp::new();
    let moderator = app.create_user("mod", RoleLevel::Moderator).await;
    let first = app.create_user("first", RoleLevel::Normal).await;
    let second = app.create_user("second", RoleLevel::Normal).await;
    let cookies = app.session_cookies(moderator.id);

    for (user, duration) in [(&first, "2h"), (&second, "30m")] {
        let response = app
            .request(
                "POST",
                &format!("/api/moderation/timeout/{}", user.id),
                Some(json!({ "duration": duration })),
                Some(&cookies),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = app
        .request("GET", "/api/moderation/timeouts", None, Some(&cookies))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let listed: Vec<&str> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(listed, vec!["second", "first"]);

    let path = format!("/api/moderation/timeout/{}", second.id);
    let response = app.request("DELETE", &path, None, Some(&cookies)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"]["timeout_until"].is_null());

    let response = app.request("DELETE", &path, None, Some(&cookies)).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.reason(), "not_timed_out");
}

#[tokio::test]
async fn test_content_deletion_levels() {
    let app = helpers::TestApp::new();
    let author = app.create_user("author", RoleLevel::Normal).await;
    let moderator = app.create_user("mod", RoleLevel::Moderator).await;
    let admin = app.create_user("root", RoleLevel::Admin).await;
    let post = app.create_post(author.id).await;
    let comment = app.create_comment(post.id, author.id).await;
    let mod_cookies = app.session_cookies(moderator.id);

    let response = app
        .request(
            "DELETE",
            &format!("/api/moderation/comments/{}", comment.id),
            None,
            Some(&mod_cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let post_path = format!("/api/moderation/posts/{}", post.id);
    let response = app.request("DELETE", &post_path, None, Some(&mod_cookies)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.reason(), "insufficient_permissions");

    let response = app
        .request("DELETE", &post_path, None, Some(&app.session_cookies(admin.id)))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("DELETE", &post_path, None, Some(&app.session_cookies(admin.id)))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_moderation_requires_session() {
    let app = helpers::TestApp::new();

    let response = app
        .request("GET", "/api/moderation/timeouts", None, None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
