//! Integration tests for the HRIS portal.
//!
//! [`FakeBackend`] serves the slice of the REST API the portal's session,
//! header and sidebar logic touches, on an ephemeral local port. Tests
//! point a real [`ApiClient`] at it and steer it through its knobs
//! (failures, delays, canned data) while counting the calls it receives.
//!
//! # Accounts
//!
//! Any email logs in with the password [`PASSWORD`]. The local part picks
//! the role: `super@` is a superadmin, `admin@` an admin, `hr@` carries a
//! role the portal does not know, and anything else is an employee.
//! Google sign-in accepts only [`GOOGLE_ID_TOKEN`]; registration refuses
//! any `taken@` address; password resets accept only [`RESET_TOKEN`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use hris_portal::services::{AuthFlow, LoginForm};
use hris_portal::{ApiClient, PortalConfig, SessionStore};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Password every fake account accepts.
pub const PASSWORD: &str = "rahasia123";

/// Message returned for a wrong password.
pub const BAD_CREDENTIALS: &str = "Email atau password salah";

/// The only Google ID token the backend recognises.
pub const GOOGLE_ID_TOKEN: &str = "google-ok";

/// Message returned for any other Google ID token.
pub const GOOGLE_UNKNOWN: &str = "Akun Google belum terdaftar";

/// First validator message returned when registering a `taken@` address.
pub const EMAIL_TAKEN: &str = "Email sudah terdaftar";

/// The only password reset token the backend accepts.
pub const RESET_TOKEN: &str = "reset-ok";

/// Message returned for any other reset token.
pub const RESET_TOKEN_INVALID: &str = "Token tidak valid atau sudah kedaluwarsa";

/// Filename the backend assigns to an uploaded profile photo.
pub const UPLOADED_PHOTO: &str = "profile-1.png";

/// Counters and knobs shared with the request handlers.
#[derive(Default)]
pub struct BackendState {
    pub mark_read_calls: AtomicUsize,
    pub notification_calls: AtomicUsize,
    pub leave_summary_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub fail_mark_read: AtomicBool,
    pub fail_badges: AtomicBool,
    pub pending_leaves: AtomicU32,
    subscription_end: Mutex<Option<DateTime<Utc>>>,
    notifications: Mutex<Vec<Value>>,
    audit_delays: Mutex<HashMap<String, Duration>>,
    profile_name: Mutex<Option<String>>,
    reset_requests: Mutex<Vec<String>>,
    uploaded_photo: Mutex<Option<(String, usize)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A running fake backend. The server task lives as long as the runtime.
pub struct FakeBackend {
    api_url: String,
    state: Arc<BackendState>,
}

impl FakeBackend {
    /// Bind `127.0.0.1:0` and start serving.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    #[allow(clippy::unwrap_used)]
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/google", post(google_login))
            .route("/api/auth/register", post(register))
            .route("/api/auth/forgot-password", post(forgot_password))
            .route("/api/auth/reset-password/{token}", post(reset_password))
            .route("/api/auth/me", get(me))
            .route("/api/leaves/stats/summary", get(leave_summary))
            .route("/api/users/notifications", get(notifications))
            .route("/api/users/notifications/read", patch(mark_read))
            .route("/api/users/me", patch(update_me))
            .route("/api/users/me/photo", post(upload_photo))
            .route("/api/audit/{scope}", get(audit))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            api_url: format!("http://{addr}/api"),
            state,
        }
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    #[must_use]
    pub fn state(&self) -> &BackendState {
        &self.state
    }

    /// Portal configuration pointing at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the bound address does not form a valid URL.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn config(&self) -> PortalConfig {
        PortalConfig::for_api_url(&self.api_url).unwrap()
    }

    /// A client for this backend over `session`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn client(&self, session: SessionStore) -> ApiClient {
        ApiClient::new(&self.config(), session).unwrap()
    }

    /// A fresh in-memory session signed in as `email`.
    ///
    /// # Panics
    ///
    /// Panics if the login is refused.
    #[allow(clippy::unwrap_used)]
    pub async fn sign_in(&self, email: &str) -> SessionStore {
        let session = SessionStore::in_memory();
        let form = LoginForm {
            email: email.to_string(),
            password: SecretString::from(PASSWORD.to_string()),
            remember: false,
        };
        AuthFlow::new(self.client(session.clone()))
            .login(&form)
            .await
            .unwrap();
        session
    }

    /// Replace the notification list with `(title, is_read)` entries.
    pub fn set_notifications(&self, entries: &[(&str, bool)]) {
        let now = Utc::now();
        *lock(&self.state.notifications) = entries
            .iter()
            .zip(1_i64..)
            .map(|((title, is_read), id)| {
                json!({
                    "id": id,
                    "title": title,
                    "message": format!("{title} details"),
                    "is_read": is_read,
                    "created_at": now,
                })
            })
            .collect();
    }

    /// Read flags as the backend currently stores them.
    #[must_use]
    pub fn stored_read_flags(&self) -> Vec<bool> {
        lock(&self.state.notifications)
            .iter()
            .map(|n| n["is_read"].as_bool().unwrap_or(false))
            .collect()
    }

    pub fn set_subscription_end(&self, end: Option<DateTime<Utc>>) {
        *lock(&self.state.subscription_end) = end;
    }

    /// Delay responses to the audit query `search` by `delay`.
    pub fn delay_audit(&self, search: &str, delay: Duration) {
        lock(&self.state.audit_delays).insert(search.to_string(), delay);
    }

    #[must_use]
    pub fn mark_read_calls(&self) -> usize {
        self.state.mark_read_calls.load(Ordering::SeqCst)
    }

    /// Addresses reset links were requested for, oldest first.
    #[must_use]
    pub fn reset_requests(&self) -> Vec<String> {
        lock(&self.state.reset_requests).clone()
    }

    /// File name and size of the last profile photo received.
    #[must_use]
    pub fn uploaded_photo(&self) -> Option<(String, usize)> {
        lock(&self.state.uploaded_photo).clone()
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

fn signed_in(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer token-"))
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn login(Json(credentials): Json<Credentials>) -> Response {
    if credentials.password != PASSWORD {
        return failure(StatusCode::UNAUTHORIZED, BAD_CREDENTIALS);
    }
    let local = credentials
        .email
        .split('@')
        .next()
        .unwrap_or_default()
        .to_string();
    let role = match local.as_str() {
        "super" => "superadmin",
        "admin" => "admin",
        "hr" => "manager",
        _ => "employee",
    };
    signed_in_as(&local, &credentials.email, role)
}

fn signed_in_as(local: &str, email: &str, role: &str) -> Response {
    Json(json!({
        "success": true,
        "token": format!("token-{local}"),
        "user": {
            "id": 1,
            "name": format!("{local} user"),
            "email": email,
            "role": role,
            "companyId": 7,
            "isExpired": false,
            "profile_image": "avatar.png",
        }
    }))
    .into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleToken {
    id_token: String,
}

async fn google_login(Json(body): Json<GoogleToken>) -> Response {
    if body.id_token != GOOGLE_ID_TOKEN {
        return failure(StatusCode::NOT_FOUND, GOOGLE_UNKNOWN);
    }
    signed_in_as("google", "google@maju.co.id", "employee")
}

async fn register(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    state.register_calls.fetch_add(1, Ordering::SeqCst);
    if body["email"].as_str().is_some_and(|email| email.starts_with("taken@")) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "message": "Validation failed",
                "errors": [
                    { "msg": EMAIL_TAKEN, "param": "email" },
                    { "msg": "Nama perusahaan sudah dipakai", "param": "companyName" },
                ]
            })),
        )
            .into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Registrasi berhasil" })),
    )
        .into_response()
}

async fn forgot_password(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<Value>,
) -> Response {
    let Some(email) = body["email"].as_str() else {
        return failure(StatusCode::BAD_REQUEST, "Email wajib diisi");
    };
    lock(&state.reset_requests).push(email.to_string());
    Json(json!({ "success": true, "message": "Link reset password telah dikirim" })).into_response()
}

async fn reset_password(Path(token): Path<String>) -> Response {
    if token != RESET_TOKEN {
        return failure(StatusCode::BAD_REQUEST, RESET_TOKEN_INVALID);
    }
    Json(json!({ "success": true, "message": "Password berhasil diubah" })).into_response()
}

async fn me(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if !signed_in(&headers) {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if state.fail_badges.load(Ordering::SeqCst) {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Server error");
    }
    let end = *lock(&state.subscription_end);
    ok(json!({
        "id": 1,
        "name": "admin user",
        "company": {
            "id": 7,
            "name": "PT Maju",
            "subscription": { "status": "ACTIVE", "endDate": end }
        }
    }))
}

async fn leave_summary(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    state.leave_summary_calls.fetch_add(1, Ordering::SeqCst);
    if !signed_in(&headers) {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if state.fail_badges.load(Ordering::SeqCst) {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Server error");
    }
    ok(json!({
        "pending": state.pending_leaves.load(Ordering::SeqCst),
        "approved": 0,
    }))
}

async fn notifications(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    state.notification_calls.fetch_add(1, Ordering::SeqCst);
    if !signed_in(&headers) {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    ok(Value::Array(lock(&state.notifications).clone()))
}

async fn mark_read(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    state.mark_read_calls.fetch_add(1, Ordering::SeqCst);
    if !signed_in(&headers) {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if state.fail_mark_read.load(Ordering::SeqCst) {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Gagal memperbarui notifikasi");
    }
    for n in lock(&state.notifications).iter_mut() {
        n["is_read"] = json!(true);
    }
    Json(json!({ "success": true, "message": "Semua notifikasi ditandai dibaca" })).into_response()
}

async fn update_me(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(update): Json<Value>,
) -> Response {
    if !signed_in(&headers) {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    let mut name = lock(&state.profile_name);
    if let Some(new_name) = update["name"].as_str() {
        *name = Some(new_name.to_string());
    }
    ok(json!({
        "id": 1,
        "name": name.clone().unwrap_or_else(|| "employee user".to_string()),
    }))
}

async fn upload_photo(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !signed_in(&headers) {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("profile_image") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let Ok(bytes) = field.bytes().await else {
            return failure(StatusCode::BAD_REQUEST, "Upload gagal");
        };
        *lock(&state.uploaded_photo) = Some((file_name, bytes.len()));
        return Json(json!({
            "success": true,
            "message": "Foto profil diperbarui",
            "filename": UPLOADED_PHOTO,
        }))
        .into_response();
    }
    failure(StatusCode::BAD_REQUEST, "File foto wajib diunggah")
}

#[derive(Deserialize)]
struct AuditQuery {
    #[serde(default)]
    search: String,
}

async fn audit(
    State(state): State<Arc<BackendState>>,
    Path(scope): Path<String>,
    Query(query): Query<AuditQuery>,
    headers: HeaderMap,
) -> Response {
    if !signed_in(&headers) {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    let delay = lock(&state.audit_delays).get(&query.search).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    ok(json!([{
        "id": 1,
        "action": format!("{scope}:{}", query.search),
        "details": null,
        "created_at": Utc::now(),
        "user": { "name": "admin user", "role": "admin" },
    }]))
}
