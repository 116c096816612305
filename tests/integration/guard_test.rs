//! Integration tests for the session and admin guards.

mod helpers;

use std::time::Duration;

use axum::http::StatusCode;

use wsso_auth::{Claims, KeyMaterial, KeyRing, MarkerPurpose, TokenPayload, TokenService};
use wsso_core::config::SigningAlgorithm;

use helpers::{
    ALICE_PASSWORD, BOB_PASSWORD, Browser, SESSION_COOKIE, TOKEN_COOKIE, TestApp, fixture_key,
};

fn rotated_material() -> KeyMaterial {
    let private = std::fs::read(fixture_key("ed25519_rotated_private.pem")).expect("fixture");
    let public = std::fs::read(fixture_key("ed25519_rotated_public.pem")).expect("fixture");
    KeyMaterial::from_pem(SigningAlgorithm::EdDsa, &private, &public).expect("rotated key")
}

#[tokio::test]
async fn test_me_requires_session() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/me", None, &Browser::new()).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), Some("Unauthorized"));
    assert!(response.clears(TOKEN_COOKIE));
    assert!(response.clears(SESSION_COOKIE));
}

#[tokio::test]
async fn test_me_with_session() {
    let app = TestApp::new().await;
    let browser = app.login("bob", BOB_PASSWORD).await;

    let response = app.request("GET", "/me", None, &browser).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "bob");
}

#[tokio::test]
async fn test_session_survives_without_token() {
    let app = TestApp::new().await;
    let mut browser = app.login("bob", BOB_PASSWORD).await;
    browser.forget(TOKEN_COOKIE);

    let response = app.request("GET", "/me", None, &browser).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_tampered_session_cookie_is_unauthenticated() {
    let app = TestApp::new().await;
    let mut browser = app.login("bob", BOB_PASSWORD).await;

    let session = browser.cookie(SESSION_COOKIE).expect("session cookie");
    let (_, signature) = session.split_once('.').expect("signed session");
    // {"id":"alice"} re-encoded under bob's signature
    let forged = format!("eyJpZCI6ImFsaWNlIn0.{signature}");
    browser.set(SESSION_COOKIE, &forged);

    let response = app.request("GET", "/me", None, &browser).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_claims_for_admin() {
    let app = TestApp::new().await;
    let browser = app.login("alice", ALICE_PASSWORD).await;

    let response = app.request("GET", "/admin/claims", None, &browser).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "alice");
    assert_eq!(response.body["admin"], true);
}

#[tokio::test]
async fn test_admin_claims_rejects_non_admin_but_keeps_session() {
    let app = TestApp::new().await;
    let mut browser = app.login("bob", BOB_PASSWORD).await;

    let response = app.request("GET", "/admin/claims", None, &browser).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), Some("Unauthorized"));
    assert!(response.cookie(TOKEN_COOKIE).is_none());
    assert!(response.cookie(SESSION_COOKIE).is_none());

    browser.absorb(&response);
    assert!(browser.cookie(TOKEN_COOKIE).is_some());
    assert!(browser.cookie(SESSION_COOKIE).is_some());

    let me = app.request("GET", "/me", None, &browser).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "bob");
}

#[tokio::test]
async fn test_admin_requires_session_even_with_token() {
    let app = TestApp::new().await;
    let mut browser = app.login("alice", ALICE_PASSWORD).await;
    browser.forget(SESSION_COOKIE);

    let response = app.request("GET", "/admin/claims", None, &browser).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_requires_token() {
    let app = TestApp::new().await;
    let mut browser = app.login("alice", ALICE_PASSWORD).await;
    browser.forget(TOKEN_COOKIE);

    let response = app.request("GET", "/admin/claims", None, &browser).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_rejects_expired_token() {
    let app = TestApp::new().await;
    let mut browser = app.login("alice", ALICE_PASSWORD).await;

    let claims = Claims::new("alice", ["admins".to_string()], true);
    let payload = serde_json::to_vec(&TokenPayload::Claims(claims)).expect("payload");
    let two_hours_ago = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_secs() as i64
        - 7_200;
    let expired = app
        .state
        .tokens
        .issuer()
        .create_at(two_hours_ago, Duration::from_secs(3_600), &payload)
        .await
        .expect("token");
    browser.set(TOKEN_COOKIE, &expired);

    let response = app.request("GET", "/admin/claims", None, &browser).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_rejects_marker_token() {
    let app = TestApp::new().await;
    let mut browser = app.login("alice", ALICE_PASSWORD).await;

    let marker = app
        .state
        .tokens
        .issue_marker(MarkerPurpose::Auth)
        .await
        .expect("marker");
    browser.set(TOKEN_COOKIE, &marker);

    let response = app.request("GET", "/admin/claims", None, &browser).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_rejects_foreign_signature() {
    let app = TestApp::new().await;
    let mut browser = app.login("bob", BOB_PASSWORD).await;

    let foreign = TokenService::new(KeyRing::new(rotated_material()), &app.state.config.auth);
    let forged = foreign
        .issue_claims(&Claims::new("bob", ["admins".to_string()], true))
        .await
        .expect("token");
    browser.set(TOKEN_COOKIE, &forged);

    let response = app.request("GET", "/admin/claims", None, &browser).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_before_rotation_still_admits() {
    let app = TestApp::new().await;
    let before = app.login("alice", ALICE_PASSWORD).await;
    let old_kid = app.state.keys.current_kid().await;

    app.state.keys.rotate(rotated_material()).await;
    assert_ne!(app.state.keys.current_kid().await, old_kid);

    let response = app.request("GET", "/admin/claims", None, &before).await;
    assert_eq!(response.status, StatusCode::OK);

    let after = app.login("alice", ALICE_PASSWORD).await;
    let response = app.request("GET", "/admin/claims", None, &after).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_auth_link_requires_session() {
    let app = TestApp::new().await;

    let response = app.request("POST", "/auth/link", None, &Browser::new()).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), Some("Unauthorized"));
}
