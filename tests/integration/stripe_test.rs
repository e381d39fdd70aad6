//! Checkout round-trip: checkout, success redirect and grant redemption.

use http::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;
use url::Url;

use crate::helpers::{BASE_URL, LinkSettings, TestApp};

async fn paid_app(token: &str) -> TestApp {
    let app = TestApp::new();
    app.seed_link(
        token,
        LinkSettings {
            price: Some(Decimal::new(5, 0)),
            ..LinkSettings::default()
        },
    )
    .await;
    app
}

async fn start_checkout(app: &TestApp, token: &str) -> String {
    let response = app
        .request(
            "POST",
            "/api/stripe/checkout",
            Some(json!({
                "token": token,
                "amount": 5,
                "repoName": "octo/secret",
                "email": "Buyer@X.com"
            })),
            &[],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.body["url"].as_str().unwrap().to_string()
}

fn grant_from(location: &str) -> String {
    Url::parse(location)
        .unwrap()
        .query_pairs()
        .find(|(k, _)| k == "grant")
        .map(|(_, v)| v.into_owned())
        .expect("grant in redirect")
}

#[tokio::test]
async fn test_checkout_charges_stored_price() {
    let app = paid_app("pay1").await;

    let url = start_checkout(&app, "pay1").await;
    assert_eq!(url, "https://checkout.test/cs_test_1");

    let request = app.gateway.last_request();
    assert_eq!(request.amount_minor, 500);
    assert_eq!(request.buyer_email, "buyer@x.com");
    assert_eq!(request.product_name, "Access to octo/secret");
    assert_eq!(
        request.success_url,
        format!("{BASE_URL}/api/stripe/success?token=pay1&session_id={{CHECKOUT_SESSION_ID}}")
    );
    assert_eq!(request.cancel_url, format!("{BASE_URL}/share/pay1?canceled=true"));
}

#[tokio::test]
async fn test_checkout_rejects_bad_requests() {
    let app = paid_app("pay2").await;
    app.seed_link("free2", LinkSettings::default()).await;

    let mismatch = app
        .request(
            "POST",
            "/api/stripe/checkout",
            Some(json!({ "token": "pay2", "amount": 1, "email": "buyer@x.com" })),
            &[],
        )
        .await;
    assert_eq!(mismatch.status, StatusCode::BAD_REQUEST);

    let free = app
        .request(
            "POST",
            "/api/stripe/checkout",
            Some(json!({ "token": "free2", "email": "buyer@x.com" })),
            &[],
        )
        .await;
    assert_eq!(free.status, StatusCode::BAD_REQUEST);

    let unknown = app
        .request(
            "POST",
            "/api/stripe/checkout",
            Some(json!({ "token": "nope", "email": "buyer@x.com" })),
            &[],
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unpaid_session_returns_to_share_page() {
    let app = paid_app("pay3").await;
    start_checkout(&app, "pay3").await;

    let response = app
        .request(
            "GET",
            "/api/stripe/success?session_id=cs_test_1&token=pay3",
            None,
            &[],
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location().unwrap(),
        format!("{BASE_URL}/share/pay3?canceled=true")
    );
}

#[tokio::test]
async fn test_session_for_other_link_is_rejected() {
    let app = paid_app("pay4").await;
    start_checkout(&app, "pay4").await;
    app.gateway.pay("cs_test_1");

    let response = app
        .request(
            "GET",
            "/api/stripe/success?session_id=cs_test_1&token=other",
            None,
            &[],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_paid_round_trip_unlocks_content() {
    let app = paid_app("pay5").await;
    start_checkout(&app, "pay5").await;
    app.gateway.pay("cs_test_1");

    let success = app
        .request(
            "GET",
            "/api/stripe/success?session_id=cs_test_1&token=pay5",
            None,
            &[],
        )
        .await;
    assert_eq!(success.status, StatusCode::SEE_OTHER);
    let location = success.location().unwrap();
    assert!(location.starts_with(&format!("{BASE_URL}/share/pay5?grant=")));

    let check = app
        .request(
            "POST",
            "/api/shares/check-access",
            Some(json!({ "token": "pay5", "email": "buyer@x.com" })),
            &[],
        )
        .await;
    assert_eq!(check.body, json!({ "valid": true }));

    let grant = grant_from(&location);
    let redeem = app
        .request(
            "POST",
            "/api/shares/pay5/redeem",
            Some(json!({ "grant": grant })),
            &[],
        )
        .await;
    assert_eq!(redeem.status, StatusCode::OK);
    assert_eq!(redeem.body, json!({ "valid": true }));
    let cookie = redeem.cookie().expect("pass cookie");

    let validate = app
        .request(
            "POST",
            "/api/shares/pay5/validate",
            None,
            &[("cookie", cookie.clone())],
        )
        .await;
    assert_eq!(validate.body, json!({ "valid": true }));

    let tree = app
        .request("GET", "/api/shares/pay5", None, &[("cookie", cookie)])
        .await;
    assert_eq!(tree.status, StatusCode::OK);

    let replay = app
        .request(
            "POST",
            "/api/shares/pay5/redeem",
            Some(json!({ "grant": grant })),
            &[],
        )
        .await;
    assert_eq!(replay.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_grant_is_bound_to_its_link() {
    let app = paid_app("pay6").await;
    app.seed_link_for(
        "pay7",
        "other",
        LinkSettings {
            price: Some(Decimal::new(5, 0)),
            ..LinkSettings::default()
        },
    )
    .await;
    start_checkout(&app, "pay6").await;
    app.gateway.pay("cs_test_1");

    let success = app
        .request(
            "GET",
            "/api/stripe/success?session_id=cs_test_1&token=pay6",
            None,
            &[],
        )
        .await;
    let grant = grant_from(&success.location().unwrap());

    let response = app
        .request(
            "POST",
            "/api/shares/pay7/redeem",
            Some(json!({ "grant": grant })),
            &[],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
