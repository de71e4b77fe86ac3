//! Shared helpers for API integration tests.
//!
//! Every test drives the real router from [`build_app_router`] against an
//! in-memory catalog and fake upload/relay adapters, so no external service
//! is needed.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use folio_api::auth::admin::AdminAccount;
use folio_api::auth::jwt::JwtConfig;
use folio_api::auth::password::hash_password;
use folio_api::auth::session::SessionRegistry;
use folio_api::config::{ServerConfig, UploadTarget};
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_core::admin::CatalogWriter;
use folio_core::contact::{ContactMessage, MessageRelay};
use folio_core::error::CoreError;
use folio_core::memory::MemoryCatalogStore;
use folio_core::photo::NewPhoto;
use folio_core::store::CatalogStore;
use folio_core::types::DbId;
use folio_core::upload::{AssetUploader, ImageAsset};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";
pub const MAX_UPLOAD_BYTES: usize = 1024 * 1024;

// ---------------------------------------------------------------------------
// Fake adapters
// ---------------------------------------------------------------------------

/// Records every upload and hands back a predictable CDN URL.
#[derive(Default)]
pub struct FakeUploader {
    calls: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl FakeUploader {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl AssetUploader for FakeUploader {
    async fn upload(&self, asset: &ImageAsset) -> Result<String, CoreError> {
        self.calls.lock().unwrap().push(asset.file_name.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::UploadFailed("upload service unavailable".into()));
        }
        Ok(format!("https://cdn.example.com/uploads/{}", asset.file_name))
    }
}

#[derive(Default)]
pub struct FakeRelay {
    sent: Mutex<Vec<ContactMessage>>,
    fail: AtomicBool,
}

impl FakeRelay {
    pub fn sent(&self) -> Vec<ContactMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl MessageRelay for FakeRelay {
    async fn send(&self, message: &ContactMessage) -> Result<(), CoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::RelayFailed("relay rejected the message".into()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Argon2 is slow in debug builds; hash the test password once.
fn admin_password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(ADMIN_PASSWORD).expect("hash test password"))
        .clone()
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".into()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".into(),
            access_token_expiry_mins: 60,
        },
        admin: AdminAccount {
            email: ADMIN_EMAIL.into(),
            password_hash: admin_password_hash(),
        },
        database_url: None,
        upload: UploadTarget::Remote {
            url: "http://127.0.0.1:9/upload".into(),
            preset: "test".into(),
        },
        max_upload_bytes: MAX_UPLOAD_BYTES,
        contact_form_url: None,
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryCatalogStore>,
    pub uploader: Arc<FakeUploader>,
    pub relay: Arc<FakeRelay>,
    pub config: ServerConfig,
}

/// App with a working fake relay.
pub fn build_test_app() -> TestApp {
    build_app(true)
}

/// App with no contact relay configured.
pub fn build_test_app_without_relay() -> TestApp {
    build_app(false)
}

fn build_app(with_relay: bool) -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryCatalogStore::new());
    let uploader = Arc::new(FakeUploader::default());
    let relay = Arc::new(FakeRelay::default());

    let state = AppState {
        store: store.clone(),
        writer: CatalogWriter::new(store.clone(), uploader.clone()),
        relay: with_relay.then(|| relay.clone() as Arc<dyn MessageRelay>),
        config: Arc::new(config.clone()),
        sessions: Arc::new(SessionRegistry::new()),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        uploader,
        relay,
        config,
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert an entry dated `day` days into 2024 and return its id.
pub async fn seed(store: &MemoryCatalogStore, caption: &str, category: &str, lens: &str, day: u32) -> DbId {
    store
        .insert(&NewPhoto {
            caption: caption.into(),
            description: None,
            category: category.into(),
            lens: lens.into(),
            image_url: format!("https://cdn.example.com/{caption}.jpg"),
            uploaded_at: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
        })
        .await
        .expect("seed photo")
}

/// Minimal bytes for an image part; the content type is what gets checked.
pub fn jpeg_bytes() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F']
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "folio-test-boundary";

#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.expect("router response")
}

fn with_auth(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header("authorization", format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn get(app: &Router, uri: &str) -> Response {
    get_auth(app, uri, None).await
}

pub async fn get_auth(app: &Router, uri: &str, token: Option<&str>) -> Response {
    let request = with_auth(Request::builder().method("GET").uri(uri), token)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    post_json_auth(app, uri, body, None).await
}

pub async fn post_json_auth(app: &Router, uri: &str, body: Value, token: Option<&str>) -> Response {
    let request = with_auth(Request::builder().method("POST").uri(uri), token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_empty_auth(app: &Router, uri: &str, token: &str) -> Response {
    let request = with_auth(Request::builder().method("POST").uri(uri), Some(token))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn send_multipart(
    app: &Router,
    method: &str,
    uri: &str,
    form: MultipartBody,
    token: Option<&str>,
) -> Response {
    let request = with_auth(Request::builder().method(method).uri(uri), token)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(form.finish()))
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: Option<&str>) -> Response {
    let request = with_auth(Request::builder().method("DELETE").uri(uri), token)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Sign in through the real endpoint and return the access token.
pub async fn login_token(app: &Router) -> String {
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["accessToken"]
        .as_str()
        .expect("accessToken")
        .to_string()
}
