//! Shared test helpers for integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use futures::StreamExt;
use http::{HeaderMap, Request, StatusCode, header};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use ghostrepo_auth::jwt::JwtEncoder;
use ghostrepo_auth::password::PasswordHasher;
use ghostrepo_billing::gateway::{META_EMAIL, META_SHARE_TOKEN};
use ghostrepo_billing::{CheckoutRequest, CheckoutSession, PaymentGateway, PaymentStatus};
use ghostrepo_core::config::AppConfig;
use ghostrepo_core::error::AppError;
use ghostrepo_core::result::AppResult;
use ghostrepo_database::Stores;
use ghostrepo_entity::content::{DirEntry, EntryKind, TreeEntry};
use ghostrepo_entity::share::{CreateShareLink, ShareLink, ShareSettingsPatch};
use ghostrepo_github::{ByteStream, RemoteContent, RemoteTree, RepoRef, SourceControl};

/// Public origin used by the test configuration.
pub const BASE_URL: &str = "https://ghostrepo.test";

/// Test application context
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// In-memory stores behind the app
    pub stores: Stores,
    /// Application config
    pub config: AppConfig,
    /// Payment processor double
    pub gateway: Arc<FakeGateway>,
}

impl TestApp {
    /// Create a new test application on fresh in-memory stores
    pub fn new() -> Self {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "server": { "public_base_url": BASE_URL },
            "database": { "url": "memory://" },
            "auth": {
                "signing_secret": "integration-secret",
                "secure_cookies": false
            },
            "github": { "app_id": "1" },
            "payment": { "secret_key": "sk_test" }
        }))
        .expect("Failed to build test config");

        let stores = Stores::memory();
        let gateway = Arc::new(FakeGateway::default());
        let state = ghostrepo_api::AppState::new(
            config.clone(),
            stores.clone(),
            Arc::new(FakeSource),
            gateway.clone(),
        );

        Self {
            router: ghostrepo_api::build_app(state),
            stores,
            config,
            gateway,
        }
    }

    /// Owner session token for `login`
    pub fn session(&self, login: &str) -> String {
        JwtEncoder::new(&self.config.auth)
            .owner_session(login, Duration::hours(1))
            .expect("Failed to sign session")
    }

    /// Insert a link with a fixed token straight into the store
    pub async fn seed_link(&self, token: &str, settings: LinkSettings) -> ShareLink {
        self.seed_link_for(token, "secret", settings).await
    }

    /// Insert an active link to `octo/{repo}`
    pub async fn seed_link_for(&self, token: &str, repo: &str, settings: LinkSettings) -> ShareLink {
        self.stores
            .shares
            .insert(&CreateShareLink {
                token: token.to_string(),
                owner: "octo".to_string(),
                repo: repo.to_string(),
                installation_id: INSTALLATION_ID,
                created_by: "octo".to_string(),
            })
            .await
            .expect("Failed to insert link");

        let patch = ShareSettingsPatch {
            price: settings.price,
            password_hash: settings.password.map(|p| {
                Some(
                    PasswordHasher::new()
                        .hash_password(p)
                        .expect("Failed to hash password"),
                )
            }),
            expires_at: settings.expires_at.map(Some),
            pinned: None,
        };
        if patch.is_empty() {
            return self
                .stores
                .shares
                .find_by_token(token)
                .await
                .expect("Lookup failed")
                .expect("Link missing");
        }
        self.stores
            .shares
            .update_settings(token, &patch)
            .await
            .expect("Failed to update link")
            .expect("Link missing")
    }

    /// Make a JSON request with optional extra headers
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, String)],
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        if body.is_some() {
            req = req.header(header::CONTENT_TYPE, "application/json");
        }
        for (name, value) in headers {
            req = req.header(*name, value);
        }

        let body = body
            .map(|b| Body::from(serde_json::to_vec(&b).expect("Failed to serialize body")))
            .unwrap_or_else(Body::empty);
        let req = req.body(body).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            raw: bytes,
        }
    }

    /// Request as the owner `login`
    pub async fn owner_request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        login: &str,
    ) -> TestResponse {
        let auth = format!("Bearer {}", self.session(login));
        self.request(method, path, body, &[("authorization", auth)])
            .await
    }
}

/// Settings applied by [`TestApp::seed_link`]
#[derive(Debug, Clone, Default)]
pub struct LinkSettings {
    /// Unlock price
    pub price: Option<Decimal>,
    /// Plaintext password
    pub password: Option<&'static str>,
    /// Expiry
    pub expires_at: Option<DateTime<Utc>>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when the body is not JSON
    pub body: Value,
    /// Raw body
    pub raw: Bytes,
}

impl TestResponse {
    /// `name=value` of the first Set-Cookie header, ready for a Cookie header
    pub fn cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }

    /// Location header of a redirect
    pub fn location(&self) -> Option<String> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

/// Installation covering every test repository not owned by `acme`.
pub const INSTALLATION_ID: i64 = 42;

/// Installation of the `acme` account.
pub const ACME_INSTALLATION_ID: i64 = 7;

/// Source-control double serving one small repository on `main`.
#[derive(Debug)]
pub struct FakeSource;

#[async_trait]
impl SourceControl for FakeSource {
    async fn repo_installation(&self, owner: &str, repo: &str) -> AppResult<Option<i64>> {
        Ok(match (owner, repo) {
            (_, "uninstalled") => None,
            ("acme", _) => Some(ACME_INSTALLATION_ID),
            _ => Some(INSTALLATION_ID),
        })
    }

    async fn default_branch(&self, _repo: &RepoRef) -> AppResult<String> {
        Ok("main".to_string())
    }

    async fn branch_head(&self, _repo: &RepoRef, branch: &str) -> AppResult<String> {
        match branch {
            "main" => Ok("c0ffee".to_string()),
            "dev" => Ok("beef01".to_string()),
            _ => Err(AppError::upstream(Some(404), "GitHub: Branch not found")),
        }
    }

    async fn tree(&self, _repo: &RepoRef, _sha: &str) -> AppResult<RemoteTree> {
        let entry = |path: &str, kind: EntryKind| TreeEntry {
            path: path.to_string(),
            kind,
            size: (kind == EntryKind::Blob).then_some(12),
            is_binary: false,
        };
        Ok(RemoteTree {
            truncated: false,
            entries: vec![
                entry("README.md", EntryKind::Blob),
                entry("src", EntryKind::Tree),
                entry("src/a.ts", EntryKind::Blob),
                entry("src/b.ts", EntryKind::Blob),
                entry("logo.png", EntryKind::Blob),
            ],
        })
    }

    async fn branches(&self, _repo: &RepoRef) -> AppResult<Vec<String>> {
        Ok(vec!["main".to_string(), "dev".to_string()])
    }

    async fn contents(
        &self,
        _repo: &RepoRef,
        path: &str,
        _git_ref: &str,
    ) -> AppResult<RemoteContent> {
        match path {
            "src" => Ok(RemoteContent::Directory(vec![
                DirEntry {
                    name: "a.ts".to_string(),
                    path: "src/a.ts".to_string(),
                    kind: EntryKind::Blob,
                },
                DirEntry {
                    name: "b.ts".to_string(),
                    path: "src/b.ts".to_string(),
                    kind: EntryKind::Blob,
                },
            ])),
            "README.md" => Ok(RemoteContent::File {
                name: "README.md".to_string(),
                path: "README.md".to_string(),
                bytes: Some(b"# secret\n".to_vec()),
            }),
            "logo.png" => Ok(RemoteContent::File {
                name: "logo.png".to_string(),
                path: "logo.png".to_string(),
                bytes: Some(vec![0x89, b'P', b'N', b'G']),
            }),
            _ => Err(AppError::upstream(Some(404), "GitHub: Not Found")),
        }
    }

    async fn zipball(&self, _repo: &RepoRef, _git_ref: &str) -> AppResult<ByteStream> {
        let chunks = vec![
            Ok(Bytes::from_static(b"PK\x03\x04")),
            Ok(Bytes::from_static(b"zipdata")),
        ];
        Ok(futures::stream::iter(chunks).boxed())
    }
}

/// Payment processor double keeping sessions in memory.
#[derive(Debug, Default)]
pub struct FakeGateway {
    sessions: Mutex<HashMap<String, CheckoutSession>>,
    requests: Mutex<Vec<CheckoutRequest>>,
}

impl FakeGateway {
    /// Marks a session as paid
    pub fn pay(&self, session_id: &str) {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.get_mut(session_id).expect("Unknown session");
        session.payment_status = PaymentStatus::Paid;
    }

    /// The most recent checkout request
    pub fn last_request(&self) -> CheckoutRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("No checkout was created")
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_checkout(&self, request: &CheckoutRequest) -> AppResult<CheckoutSession> {
        let mut sessions = self.sessions.lock().unwrap();
        let id = format!("cs_test_{}", sessions.len() + 1);
        let session = CheckoutSession {
            id: id.clone(),
            url: Some(format!("https://checkout.test/{id}")),
            payment_status: PaymentStatus::Unpaid,
            metadata: HashMap::from([
                (META_SHARE_TOKEN.to_string(), request.share_token.clone()),
                (META_EMAIL.to_string(), request.buyer_email.clone()),
            ]),
        };
        sessions.insert(id, session.clone());
        self.requests.lock().unwrap().push(request.clone());
        Ok(session)
    }

    async fn retrieve_session(&self, session_id: &str) -> AppResult<CheckoutSession> {
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or_else(|| AppError::upstream(Some(404), "Stripe: No such checkout session"))
    }
}
