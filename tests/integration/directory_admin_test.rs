//! Integration tests for the Basic-credential directory administration surface.

mod helpers;

use std::sync::Arc;

use axum::http::{StatusCode, header};
use serde_json::Value;

use helpers::{
    ALICE_PASSWORD, BOB_PASSWORD, Browser, CountingDirectory, OPERATOR_PASSWORD, OPERATOR_USER,
    TestApp,
};

const OPERATOR: Option<(&str, &str)> = Some((OPERATOR_USER, OPERATOR_PASSWORD));

#[tokio::test]
async fn test_list_requires_credential() {
    let app = TestApp::new().await;

    let response = app.directory_request("GET", "/directory/users", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), Some("Unauthorized"));
    assert_eq!(
        response
            .headers
            .get(header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok()),
        Some("Basic realm=\"wsso\"")
    );
}

#[tokio::test]
async fn test_wrong_password_or_username_rejected() {
    let app = TestApp::new().await;

    for credentials in [
        (OPERATOR_USER, "wrong-secret"),
        ("root", OPERATOR_PASSWORD),
        ("", ""),
    ] {
        let response = app
            .directory_request("GET", "/directory/users", Some(credentials))
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.error(), Some("Unauthorized"));
    }
}

#[tokio::test]
async fn test_rejected_credential_never_reaches_directory() {
    let directory = Arc::new(CountingDirectory::default());
    let app = TestApp::with_directory(helpers::test_config(), directory.clone()).await;

    for credentials in [None, Some((OPERATOR_USER, "wrong-secret"))] {
        let list = app
            .directory_request("GET", "/directory/users", credentials)
            .await;
        assert_eq!(list.status, StatusCode::UNAUTHORIZED);
        assert_eq!(list.body, serde_json::json!({ "error": "Unauthorized" }));

        let delete = app
            .directory_request("DELETE", "/directory/users/bob", credentials)
            .await;
        assert_eq!(delete.status, StatusCode::UNAUTHORIZED);
        assert_eq!(delete.body, serde_json::json!({ "error": "Unauthorized" }));
    }

    assert_eq!(directory.lists(), 0);
    assert_eq!(directory.deletes(), 0);

    let admitted = app
        .directory_request("GET", "/directory/users", OPERATOR)
        .await;
    assert_eq!(admitted.status, StatusCode::OK);
    assert_eq!(directory.lists(), 1);
}

#[tokio::test]
async fn test_list_users() {
    let app = TestApp::new().await;

    let response = app
        .directory_request("GET", "/directory/users", OPERATOR)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let users = response.body["users"].as_array().expect("users array");
    let names: Vec<&str> = users
        .iter()
        .filter_map(|u| u.get("username").and_then(Value::as_str))
        .collect();
    assert_eq!(names, vec!["alice", "bob"]);
    assert!(!response.body.to_string().contains("argon2"));
}

#[tokio::test]
async fn test_delete_user() {
    let app = TestApp::new().await;

    let response = app
        .directory_request("DELETE", "/directory/users/bob", OPERATOR)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), Some("User 'bob' deleted successfully."));

    let login = app
        .request(
            "POST",
            "/login",
            Some(serde_json::json!({ "username": "bob", "password": BOB_PASSWORD })),
            &Browser::new(),
        )
        .await;
    assert_eq!(login.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_unknown_user() {
    let app = TestApp::new().await;

    let response = app
        .directory_request("DELETE", "/directory/users/nobody", OPERATOR)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error(), Some("User 'nobody' does not exist."));
}

#[tokio::test]
async fn test_delete_requires_credential() {
    let app = TestApp::new().await;

    let response = app
        .directory_request("DELETE", "/directory/users/bob", None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let still_there = app
        .directory_request("GET", "/directory/users", OPERATOR)
        .await;
    assert_eq!(still_there.body["users"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_admin_session_does_not_open_directory_surface() {
    let app = TestApp::new().await;
    let browser = app.login("alice", ALICE_PASSWORD).await;

    let response = app.request("GET", "/directory/users", None, &browser).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_directory_manager_rejection_is_internal() {
    let app = TestApp::with_config(helpers::test_config_with_manager("")).await;

    let response = app
        .directory_request("GET", "/directory/users", OPERATOR)
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error(), Some("Failed to get users."));
}
