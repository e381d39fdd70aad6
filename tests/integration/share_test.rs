//! Owner dashboard: share, configure and unshare repositories.

use http::StatusCode;
use serde_json::json;

use crate::helpers::{ACME_INSTALLATION_ID, BASE_URL, INSTALLATION_ID, TestApp};

async fn share_repo(app: &TestApp, login: &str, repo: &str) -> String {
    let response = app
        .owner_request(
            "POST",
            "/api/shares",
            Some(json!({ "owner": login, "repo": repo, "installation_id": 42 })),
            login,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_share_returns_url() {
    let app = TestApp::new();

    let response = app
        .owner_request(
            "POST",
            "/api/shares",
            Some(json!({ "owner": "octo", "repo": "secret", "installation_id": 42 })),
            "octo",
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let token = response.body["token"].as_str().unwrap();
    assert_eq!(token.len(), 32);
    assert_eq!(
        response.body["share_url"],
        format!("{BASE_URL}/share/{token}")
    );
}

#[tokio::test]
async fn test_resharing_keeps_token() {
    let app = TestApp::new();
    let first = share_repo(&app, "octo", "secret").await;
    let second = share_repo(&app, "octo", "secret").await;
    assert_eq!(first, second);

    let other = app
        .owner_request(
            "POST",
            "/api/shares",
            Some(json!({ "owner": "octo", "repo": "secret", "installation_id": 42 })),
            "mallory",
        )
        .await;
    assert_eq!(other.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_checks_installation_upstream() {
    let app = TestApp::new();
    let share = |repo: &str, installation_id: i64| {
        app.owner_request(
            "POST",
            "/api/shares",
            Some(json!({ "owner": "acme", "repo": repo, "installation_id": installation_id })),
            "mallory",
        )
    };

    let foreign = share("private", INSTALLATION_ID).await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);
    assert_eq!(foreign.body["code"], "AUTHORIZATION");

    let missing = share("uninstalled", ACME_INSTALLATION_ID).await;
    assert_eq!(missing.status, StatusCode::FORBIDDEN);

    let list = app.owner_request("GET", "/api/shares", None, "mallory").await;
    assert_eq!(list.body["total_items"], 0);

    let own = share("private", ACME_INSTALLATION_ID).await;
    assert_eq!(own.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_requires_session() {
    let app = TestApp::new();

    let anonymous = app.request("GET", "/api/shares", None, &[]).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["code"], "AUTHENTICATION");

    let forged = app
        .request(
            "GET",
            "/api/shares",
            None,
            &[("authorization", "Bearer not-a-jwt".to_string())],
        )
        .await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let app = TestApp::new();
    let cookie = format!("ghostrepo_session={}", app.session("octo"));

    let response = app
        .request("GET", "/api/shares", None, &[("cookie", cookie)])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_items"], 0);
}

#[tokio::test]
async fn test_list_is_pinned_first() {
    let app = TestApp::new();
    let first = share_repo(&app, "octo", "alpha").await;
    let _second = share_repo(&app, "octo", "beta").await;
    share_repo(&app, "someone", "gamma").await;

    let pin = app
        .owner_request(
            "PATCH",
            &format!("/api/shares/{first}"),
            Some(json!({ "pinned": true })),
            "octo",
        )
        .await;
    assert_eq!(pin.status, StatusCode::OK);
    assert_eq!(pin.body["pinned"], true);

    let list = app
        .owner_request("GET", "/api/shares?page=1&per_page=10", None, "octo")
        .await;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.body["total_items"], 2);
    let items = list.body["items"].as_array().unwrap();
    assert_eq!(items[0]["token"], first);
    assert_eq!(items[0]["share_url"], format!("{BASE_URL}/share/{first}"));
    assert!(items[0].get("password_hash").is_none());
}

#[tokio::test]
async fn test_update_settings() {
    let app = TestApp::new();
    let token = share_repo(&app, "octo", "secret").await;
    let path = format!("/api/shares/{token}");

    let update = app
        .owner_request(
            "PATCH",
            &path,
            Some(json!({ "price": 4.999, "password": "hunter2", "expires_in": "7D" })),
            "octo",
        )
        .await;
    assert_eq!(update.status, StatusCode::OK, "{:?}", update.body);
    assert_eq!(update.body["price"], 5.0);
    assert_eq!(update.body["password_protected"], true);
    assert!(update.body["expires_at"].is_string());

    let cleared = app
        .owner_request(
            "PATCH",
            &path,
            Some(json!({ "clear_password": true, "clear_expiry": true })),
            "octo",
        )
        .await;
    assert_eq!(cleared.body["password_protected"], false);
    assert!(cleared.body["expires_at"].is_null());

    let empty = app
        .owner_request("PATCH", &path, Some(json!({})), "octo")
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let negative = app
        .owner_request("PATCH", &path, Some(json!({ "price": -1 })), "octo")
        .await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);

    let stranger = app
        .owner_request("PATCH", &path, Some(json!({ "pinned": true })), "mallory")
        .await;
    assert_eq!(stranger.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unshare_invalidates_link() {
    let app = TestApp::new();
    let token = share_repo(&app, "octo", "secret").await;
    let path = format!("/api/shares/{token}");

    let stranger = app.owner_request("DELETE", &path, None, "mallory").await;
    assert_eq!(stranger.status, StatusCode::FORBIDDEN);

    let deleted = app.owner_request("DELETE", &path, None, "octo").await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let validate = app
        .request("POST", &format!("{path}/validate"), None, &[])
        .await;
    assert_eq!(validate.status, StatusCode::NOT_FOUND);

    let reshared = share_repo(&app, "octo", "secret").await;
    assert_ne!(reshared, token);
}
