//! Operational endpoints.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health_reports_memory_store() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, &[]).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["database"], "connected");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/nothing/here", None, &[]).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
