//! Visitor gate: validate, check-access and pass cookies.

use chrono::{Duration, Utc};
use http::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;

use crate::helpers::{LinkSettings, TestApp};

#[tokio::test]
async fn test_unknown_token_is_not_found() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/api/shares/nope/validate", Some(json!({})), &[])
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["valid"], false);
    assert_eq!(response.body["message"], "Invalid token");
}

#[tokio::test]
async fn test_open_link_sets_visitor_pass() {
    let app = TestApp::new();
    app.seed_link("open1", LinkSettings::default()).await;

    let response = app
        .request("POST", "/api/shares/open1/validate", None, &[])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "valid": true }));
    let cookie = response.cookie().expect("pass cookie");
    assert!(cookie.starts_with("ghostrepo_pass_open1="));
}

#[tokio::test]
async fn test_paywall_then_paid_unlock() {
    let app = TestApp::new();
    app.seed_link(
        "abc123",
        LinkSettings {
            price: Some(Decimal::new(5, 0)),
            ..LinkSettings::default()
        },
    )
    .await;

    let response = app
        .request(
            "POST",
            "/api/shares/abc123/validate",
            Some(json!({ "token": "abc123" })),
            &[],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["valid"], false);
    assert_eq!(response.body["paywall"], true);
    assert_eq!(response.body["price"], 5.0);
    assert_eq!(response.body["message"], "This repo is behind a paywall");

    let check = app
        .request(
            "POST",
            "/api/shares/check-access",
            Some(json!({ "token": "abc123", "email": "buyer@x.com" })),
            &[],
        )
        .await;
    assert_eq!(check.body, json!({ "valid": false }));

    app.stores
        .unlocks
        .upsert_intent("abc123", "buyer@x.com")
        .await
        .unwrap();
    app.stores
        .unlocks
        .mark_paid("abc123", Some("buyer@x.com"))
        .await
        .unwrap();

    let check = app
        .request(
            "POST",
            "/api/shares/check-access",
            Some(json!({ "token": "abc123", "email": "Buyer@X.com" })),
            &[],
        )
        .await;
    assert_eq!(check.status, StatusCode::OK);
    assert_eq!(check.body, json!({ "valid": true }));
}

#[tokio::test]
async fn test_expired_link_reports_expired() {
    let app = TestApp::new();
    app.seed_link(
        "old1",
        LinkSettings {
            price: Some(Decimal::new(5, 0)),
            password: Some("hunter2"),
            expires_at: Some(Utc::now() - Duration::days(1)),
        },
    )
    .await;

    let response = app
        .request(
            "POST",
            "/api/shares/old1/validate",
            Some(json!({ "password": "hunter2" })),
            &[],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({ "valid": false, "expired": true, "message": "Link expired" })
    );
    assert!(response.cookie().is_none());
}

#[tokio::test]
async fn test_password_flow_remembers_proof() {
    let app = TestApp::new();
    app.seed_link(
        "pw1",
        LinkSettings {
            password: Some("hunter2"),
            ..LinkSettings::default()
        },
    )
    .await;

    let missing = app
        .request("POST", "/api/shares/pw1/validate", Some(json!({})), &[])
        .await;
    assert_eq!(missing.body, json!({ "valid": false, "passwordRequired": true }));

    let wrong = app
        .request(
            "POST",
            "/api/shares/pw1/validate",
            Some(json!({ "password": "nope" })),
            &[],
        )
        .await;
    assert_eq!(wrong.body["passwordRequired"], true);
    assert_eq!(wrong.body["message"], "Incorrect password");

    let right = app
        .request(
            "POST",
            "/api/shares/pw1/validate",
            Some(json!({ "password": "hunter2" })),
            &[],
        )
        .await;
    assert_eq!(right.body, json!({ "valid": true }));
    let cookie = right.cookie().expect("pass cookie");

    let tree = app
        .request("GET", "/api/shares/pw1", None, &[("cookie", cookie)])
        .await;
    assert_eq!(tree.status, StatusCode::OK);
    assert_eq!(tree.body["sha"], "c0ffee");
}

#[tokio::test]
async fn test_password_change_invalidates_pass() {
    let app = TestApp::new();
    app.seed_link(
        "pw2",
        LinkSettings {
            password: Some("hunter2"),
            ..LinkSettings::default()
        },
    )
    .await;

    let right = app
        .request(
            "POST",
            "/api/shares/pw2/validate",
            Some(json!({ "password": "hunter2" })),
            &[],
        )
        .await;
    let cookie = right.cookie().expect("pass cookie");

    let update = app
        .owner_request(
            "PATCH",
            "/api/shares/pw2",
            Some(json!({ "password": "correct horse" })),
            "octo",
        )
        .await;
    assert_eq!(update.status, StatusCode::OK);

    let tree = app
        .request("GET", "/api/shares/pw2", None, &[("cookie", cookie)])
        .await;
    assert_eq!(tree.status, StatusCode::FORBIDDEN);
    assert_eq!(tree.body["code"], "AUTHORIZATION");
}

#[tokio::test]
async fn test_check_access_rejects_bad_email() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/shares/check-access",
            Some(json!({ "token": "abc123", "email": "nobody" })),
            &[],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "VALIDATION");
}
