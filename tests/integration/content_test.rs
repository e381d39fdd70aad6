//! Repository browsing through the visitor gate.

use http::{StatusCode, header};
use rust_decimal::Decimal;
use serde_json::json;

use crate::helpers::{LinkSettings, TestApp};

#[tokio::test]
async fn test_tree_marks_binary_entries() {
    let app = TestApp::new();
    app.seed_link("tree1", LinkSettings::default()).await;

    let response = app.request("GET", "/api/shares/tree1", None, &[]).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["owner"], "octo");
    assert_eq!(response.body["repo"], "secret");
    assert_eq!(response.body["branch"], "main");
    assert_eq!(response.body["truncated"], false);

    let tree = response.body["tree"].as_array().unwrap();
    assert_eq!(tree.len(), 5);
    let logo = tree.iter().find(|e| e["path"] == "logo.png").unwrap();
    assert_eq!(logo["is_binary"], true);
    assert_eq!(logo["type"], "blob");
    let src = tree.iter().find(|e| e["path"] == "src").unwrap();
    assert_eq!(src["type"], "tree");
}

#[tokio::test]
async fn test_hierarchy_puts_directories_first() {
    let app = TestApp::new();
    app.seed_link("tree2", LinkSettings::default()).await;

    let response = app
        .request("GET", "/api/shares/tree2/hierarchy?branch=dev", None, &[])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["branch"], "dev");
    let nodes = response.body["nodes"].as_array().unwrap();
    let names: Vec<&str> = nodes.iter().map(|n| n["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["src", "README.md", "logo.png"]);

    let children: Vec<&str> = nodes[0]["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap())
        .collect();
    assert_eq!(children, vec!["a.ts", "b.ts"]);
}

#[tokio::test]
async fn test_unknown_branch_passes_upstream_status() {
    let app = TestApp::new();
    app.seed_link("tree3", LinkSettings::default()).await;

    let response = app
        .request("GET", "/api/shares/tree3?branch=gone", None, &[])
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["code"], "EXTERNAL_SERVICE");
}

#[tokio::test]
async fn test_branches() {
    let app = TestApp::new();
    app.seed_link("br1", LinkSettings::default()).await;

    let response = app
        .request("GET", "/api/shares/br1/branches", None, &[])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "branches": ["main", "dev"] }));
}

#[tokio::test]
async fn test_file_and_directory_contents() {
    let app = TestApp::new();
    app.seed_link("file1", LinkSettings::default()).await;

    let readme = app
        .request("GET", "/api/shares/file?token=file1&path=README.md", None, &[])
        .await;
    assert_eq!(readme.status, StatusCode::OK);
    assert_eq!(readme.body["type"], "file");
    assert_eq!(readme.body["content"], "# secret\n");
    assert_eq!(readme.body["is_binary"], false);

    let logo = app
        .request("GET", "/api/shares/file?token=file1&path=logo.png", None, &[])
        .await;
    assert_eq!(logo.body["is_binary"], true);
    assert!(logo.body["content"].is_null());

    let dir = app
        .request("GET", "/api/shares/file?token=file1&path=src", None, &[])
        .await;
    assert_eq!(dir.body["type"], "directory");
    assert_eq!(dir.body["files"].as_array().unwrap().len(), 2);

    let escape = app
        .request(
            "GET",
            "/api/shares/file?token=file1&path=../etc/passwd",
            None,
            &[],
        )
        .await;
    assert_eq!(escape.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_zip_streams_archive() {
    let app = TestApp::new();
    app.seed_link("zip1", LinkSettings::default()).await;

    let response = app
        .request("GET", "/api/shares/zip1/zip", None, &[])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers.get(header::CONTENT_TYPE).unwrap(),
        "application/zip"
    );
    assert_eq!(
        response.headers.get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"secret-main.zip\""
    );
    assert_eq!(&response.raw[..], b"PK\x03\x04zipdata");
}

#[tokio::test]
async fn test_content_is_gated() {
    let app = TestApp::new();
    app.seed_link(
        "paid1",
        LinkSettings {
            price: Some(Decimal::new(5, 0)),
            ..LinkSettings::default()
        },
    )
    .await;

    let tree = app.request("GET", "/api/shares/paid1", None, &[]).await;
    assert_eq!(tree.status, StatusCode::FORBIDDEN);

    let zip = app.request("GET", "/api/shares/paid1/zip", None, &[]).await;
    assert_eq!(zip.status, StatusCode::FORBIDDEN);

    let missing = app.request("GET", "/api/shares/missing", None, &[]).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}
