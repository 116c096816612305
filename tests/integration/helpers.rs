//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum_extra::extract::cookie::Cookie;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;
use tower::ServiceExt;

use wsso_api::{AppState, build_app};
use wsso_auth::KeyRing;
use wsso_core::config::AppConfig;
use wsso_core::traits::{Directory, DirectoryError, IdentitySummary, NewIdentity};

/// Basic credential for the directory administration surface
pub const OPERATOR_USER: &str = "operator";
pub const OPERATOR_PASSWORD: &str = "operator-secret";

/// Seeded identities: alice is in `admins`, bob is not
pub const ALICE_PASSWORD: &str = "alice-password";
pub const BOB_PASSWORD: &str = "bob-password";

const ALICE_HASH: &str = "$argon2id$v=19$m=8,t=1,p=1$NmRmZGIwMGZjZjJiYTg4Zg$iQu3QwV4tjL32YDeB+uTRx1d1AaBddFVg2eNnT3WiF4";
const BOB_HASH: &str = "$argon2id$v=19$m=8,t=1,p=1$YjU2MzU5ODg0ZTNkYjAzNw$GIN46uWHl9krGii2h+7O697DKBHnAVy2uZdsLoK06WA";

pub const TOKEN_COOKIE: &str = "token";
pub const SESSION_COOKIE: &str = "wsso_session";

/// Absolute path of a PEM fixture
pub fn fixture_key(name: &str) -> String {
    format!(
        "{}/tests/fixtures/keys/{}",
        env!("CARGO_MANIFEST_DIR"),
        name
    )
}

/// Configuration pointing at the fixture keys with two seeded identities
pub fn test_config() -> AppConfig {
    test_config_with_manager("manager-secret")
}

/// Same as [`test_config`] with a custom directory manager secret
pub fn test_config_with_manager(manager_password: &str) -> AppConfig {
    let document = format!(
        r#"
        [auth]
        private_key_path = "{private_key}"
        public_key_path = "{public_key}"
        algorithm = "EdDSA"
        issuer = "wsso"

        [session]
        secret = "integration-session-secret-0123456789"

        [admin]
        username = "{OPERATOR_USER}"
        password = "{OPERATOR_PASSWORD}"

        [directory]
        manager_password = "{manager_password}"
        timeout_ms = 1000
        max_retries = 1
        retry_base_delay_ms = 1

        [[directory.identities]]
        username = "alice"
        password_hash = "{ALICE_HASH}"
        email = "alice@example.com"
        groups = ["admins", "users"]

        [[directory.identities]]
        username = "bob"
        password_hash = "{BOB_HASH}"
        email = "bob@example.com"
        groups = ["users"]
        "#,
        private_key = fixture_key("ed25519_private.pem"),
        public_key = fixture_key("ed25519_public.pem"),
    );
    AppConfig::from_toml_str(&document).expect("Failed to parse test config")
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for issuing tokens and rotating keys directly
    pub state: AppState,
}

impl TestApp {
    /// Create a test application over the seeded in-memory directory
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Create a test application from a custom configuration
    pub async fn with_config(config: AppConfig) -> Self {
        let directory =
            wsso_directory::build_directory(&config.directory).expect("Failed to build directory");
        Self::with_directory(config, directory).await
    }

    /// Create a test application over an arbitrary directory
    pub async fn with_directory(config: AppConfig, directory: Arc<dyn Directory>) -> Self {
        let keys = KeyRing::load(&config.auth)
            .await
            .expect("Failed to load fixture keys");
        let state = AppState::new(config, directory, keys);
        let router = build_app(state.clone());
        Self { router, state }
    }

    /// Send a request through the full middleware stack
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let cookies = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| Cookie::parse(value.to_string()).ok())
            .collect();

        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            cookies,
            body,
        }
    }

    /// Make a browser request carrying the browser's cookies
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        browser: &Browser,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);

        if let Some(cookie) = browser.header() {
            req = req.header(header::COOKIE, cookie);
        }

        let body = match body {
            Some(body) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&body).expect("Failed to serialize body"))
            }
            None => Body::empty(),
        };

        self.send(req.body(body).expect("Failed to build request"))
            .await
    }

    /// Log in and return a browser holding the resulting cookies
    pub async fn login(&self, username: &str, password: &str) -> Browser {
        let mut browser = Browser::new();
        let response = self
            .request(
                "POST",
                "/login",
                Some(serde_json::json!({
                    "username": username,
                    "password": password,
                })),
                &browser,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        browser.absorb(&response);
        browser
    }

    /// Call the directory administration surface with optional Basic credentials
    pub async fn directory_request(
        &self,
        method: &str,
        path: &str,
        credentials: Option<(&str, &str)>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        if let Some((username, password)) = credentials {
            req = req.header(header::AUTHORIZATION, basic_header(username, password));
        }
        self.send(req.body(Body::empty()).expect("Failed to build request"))
            .await
    }
}

/// `Authorization` value for HTTP Basic
pub fn basic_header(username: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{username}:{password}")))
}

/// Cookie jar kept between requests, like a browser would
#[derive(Debug, Clone, Default)]
pub struct Browser {
    cookies: BTreeMap<String, String>,
}

impl Browser {
    /// A browser with no cookies
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the `Set-Cookie` headers of a response
    pub fn absorb(&mut self, response: &TestResponse) {
        for cookie in &response.cookies {
            if is_removal(cookie) {
                self.cookies.remove(cookie.name());
            } else {
                self.cookies
                    .insert(cookie.name().to_string(), cookie.value().to_string());
            }
        }
    }

    /// Current value of a cookie
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Set or overwrite a cookie
    pub fn set(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    /// Drop a cookie
    pub fn forget(&mut self, name: &str) {
        self.cookies.remove(name);
    }

    fn header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed `Set-Cookie` headers
    pub cookies: Vec<Cookie<'static>>,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// `error` field of the body
    pub fn error(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }

    /// `message` field of the body
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    /// A cookie set by this response
    pub fn cookie(&self, name: &str) -> Option<&Cookie<'static>> {
        self.cookies.iter().find(|c| c.name() == name)
    }

    /// Whether this response expires the named cookie
    pub fn clears(&self, name: &str) -> bool {
        self.cookie(name).is_some_and(is_removal)
    }
}

fn is_removal(cookie: &Cookie<'_>) -> bool {
    cookie.max_age().is_some_and(|age| age.is_zero())
}

/// Directory whose credential check passes but whose group lookups fail
#[derive(Debug)]
pub struct UnreachableGroups;

#[async_trait]
impl Directory for UnreachableGroups {
    async fn bind(&self, _username: &str, _password: &str) -> Result<(), DirectoryError> {
        Ok(())
    }

    async fn group_membership(&self, _username: &str) -> Result<Vec<String>, DirectoryError> {
        Err(DirectoryError::Unavailable {
            detail: "ldap://directory.internal:389 connection refused".to_string(),
        })
    }

    async fn is_member_of(&self, _username: &str, _group: &str) -> Result<bool, DirectoryError> {
        Err(DirectoryError::Unavailable {
            detail: "ldap://directory.internal:389 connection refused".to_string(),
        })
    }

    async fn register(&self, _identity: NewIdentity) -> Result<(), DirectoryError> {
        Ok(())
    }

    async fn list_identities(
        &self,
        _manager_password: &str,
    ) -> Result<Vec<IdentitySummary>, DirectoryError> {
        Ok(Vec::new())
    }

    async fn delete_identity(
        &self,
        username: &str,
        _manager_password: &str,
    ) -> Result<String, DirectoryError> {
        Err(DirectoryError::NotFound(username.to_string()))
    }
}

/// Directory that records how often its privileged operations are called
#[derive(Debug, Default)]
pub struct CountingDirectory {
    lists: AtomicUsize,
    deletes: AtomicUsize,
}

impl CountingDirectory {
    /// Calls made to `list_identities`
    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    /// Calls made to `delete_identity`
    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Directory for CountingDirectory {
    async fn bind(&self, _username: &str, _password: &str) -> Result<(), DirectoryError> {
        Err(DirectoryError::InvalidCredentials)
    }

    async fn group_membership(&self, _username: &str) -> Result<Vec<String>, DirectoryError> {
        Ok(Vec::new())
    }

    async fn is_member_of(&self, _username: &str, _group: &str) -> Result<bool, DirectoryError> {
        Ok(false)
    }

    async fn register(&self, _identity: NewIdentity) -> Result<(), DirectoryError> {
        Ok(())
    }

    async fn list_identities(
        &self,
        _manager_password: &str,
    ) -> Result<Vec<IdentitySummary>, DirectoryError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn delete_identity(
        &self,
        username: &str,
        _manager_password: &str,
    ) -> Result<String, DirectoryError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(username.to_string())
    }
}
