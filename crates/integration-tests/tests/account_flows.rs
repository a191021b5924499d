//! Google sign-in, registration, password recovery and profile photos.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::Ordering;

use hris_integration_tests::{
    EMAIL_TAKEN, FakeBackend, GOOGLE_ID_TOKEN, GOOGLE_UNKNOWN, PASSWORD, RESET_TOKEN,
    RESET_TOKEN_INVALID, UPLOADED_PHOTO,
};
use hris_portal::api::Upload;
use hris_portal::navigation::routes;
use hris_portal::services::{AuthFlow, LoginForm, ProfileFlow, RegisterForm};
use hris_portal::session::SessionChange;
use hris_portal::storage::keys;
use hris_portal::{KeyValueStore, MemoryStore, SessionStore};
use secrecy::SecretString;

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

fn registration(email: &str) -> RegisterForm {
    RegisterForm {
        first_name: "Ayu".to_string(),
        last_name: "Putri".to_string(),
        email: email.to_string(),
        company_name: "PT Maju".to_string(),
        password: secret("rahasia123"),
        confirm_password: secret("rahasia123"),
    }
}

// =============================================================================
// Google sign-in
// =============================================================================

#[tokio::test]
async fn test_google_login_persists_session_and_keeps_remembered_email() {
    let backend = FakeBackend::start().await;
    let storage = Arc::new(MemoryStore::new());
    let session = SessionStore::new(storage.clone());
    let flow = AuthFlow::new(backend.client(session.clone()));

    flow.login(&LoginForm {
        email: "budi@maju.co.id".to_string(),
        password: secret(PASSWORD),
        remember: true,
    })
    .await
    .unwrap();

    let route = flow.google_login(&secret(GOOGLE_ID_TOKEN)).await.unwrap();

    assert_eq!(route, routes::EMPLOYEE_HOME);
    assert_eq!(storage.get(keys::TOKEN).unwrap().as_deref(), Some("token-google"));
    assert_eq!(storage.get(keys::NAME).unwrap().as_deref(), Some("google user"));
    assert_eq!(
        storage.get(keys::REMEMBER_EMAIL).unwrap().as_deref(),
        Some("budi@maju.co.id")
    );
}

#[tokio::test]
async fn test_unknown_google_account_leaves_session_empty() {
    let backend = FakeBackend::start().await;
    let session = SessionStore::in_memory();
    let flow = AuthFlow::new(backend.client(session.clone()));

    let err = flow.google_login(&secret("someone-else")).await.unwrap_err();

    assert_eq!(err.message, GOOGLE_UNKNOWN);
    assert_eq!(err.cause.status(), Some(404));
    assert!(session.current().unwrap().is_none());
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_sends_visitor_to_login() {
    let backend = FakeBackend::start().await;
    let flow = AuthFlow::new(backend.client(SessionStore::in_memory()));

    let route = flow.register(&registration("ayu@maju.co.id")).await.unwrap();

    assert_eq!(route, routes::LOGIN);
    assert_eq!(backend.state().register_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_register_surfaces_first_validator_message() {
    let backend = FakeBackend::start().await;
    let flow = AuthFlow::new(backend.client(SessionStore::in_memory()));

    let err = flow.register(&registration("taken@maju.co.id")).await.unwrap_err();

    assert_eq!(err.message, EMAIL_TAKEN);
    assert_eq!(err.cause.status(), Some(400));
}

// =============================================================================
// Password recovery
// =============================================================================

#[tokio::test]
async fn test_forgot_password_remembers_address_and_shows_check_email() {
    let backend = FakeBackend::start().await;
    let storage = Arc::new(MemoryStore::new());
    let flow = AuthFlow::new(backend.client(SessionStore::new(storage.clone())));

    let route = flow.forgot_password(" sari@maju.co.id ").await.unwrap();

    assert_eq!(route, routes::CHECK_EMAIL);
    assert_eq!(
        storage.get(keys::RESET_EMAIL).unwrap().as_deref(),
        Some("sari@maju.co.id")
    );
    assert_eq!(backend.reset_requests(), vec!["sari@maju.co.id".to_string()]);
}

#[tokio::test]
async fn test_resend_goes_to_the_stored_address() {
    let backend = FakeBackend::start().await;
    let flow = AuthFlow::new(backend.client(SessionStore::in_memory()));

    assert_eq!(flow.resend_reset_link().await.unwrap(), routes::FORGOT_PASSWORD);
    assert!(backend.reset_requests().is_empty());

    flow.forgot_password("sari@maju.co.id").await.unwrap();
    assert_eq!(flow.resend_reset_link().await.unwrap(), routes::CHECK_EMAIL);
    assert_eq!(
        backend.reset_requests(),
        vec!["sari@maju.co.id".to_string(), "sari@maju.co.id".to_string()]
    );
}

#[tokio::test]
async fn test_reset_password_clears_reset_email() {
    let backend = FakeBackend::start().await;
    let storage = Arc::new(MemoryStore::new());
    let flow = AuthFlow::new(backend.client(SessionStore::new(storage.clone())));
    flow.forgot_password("sari@maju.co.id").await.unwrap();

    let route = flow
        .reset_password(RESET_TOKEN, &secret("baru123"), &secret("baru123"))
        .await
        .unwrap();

    assert_eq!(route, routes::LOGIN);
    assert_eq!(storage.get(keys::RESET_EMAIL).unwrap(), None);
}

#[tokio::test]
async fn test_rejected_reset_token_keeps_reset_email() {
    let backend = FakeBackend::start().await;
    let storage = Arc::new(MemoryStore::new());
    let flow = AuthFlow::new(backend.client(SessionStore::new(storage.clone())));
    flow.forgot_password("sari@maju.co.id").await.unwrap();

    let err = flow
        .reset_password("expired", &secret("baru123"), &secret("baru123"))
        .await
        .unwrap_err();

    assert_eq!(err.message, RESET_TOKEN_INVALID);
    assert_eq!(
        storage.get(keys::RESET_EMAIL).unwrap().as_deref(),
        Some("sari@maju.co.id")
    );
}

// =============================================================================
// Profile photo
// =============================================================================

#[tokio::test]
async fn test_photo_upload_updates_avatar_on_every_tab() {
    let backend = FakeBackend::start().await;
    let session = backend.sign_in("budi@maju.co.id").await;
    let mut other_tab = session.tab().subscribe();
    let flow = ProfileFlow::new(backend.client(session.clone()));

    let filename = flow
        .upload_photo(Upload::new("me.png", "image/png", vec![0x89, b'P', b'N', b'G']))
        .await
        .unwrap();

    assert_eq!(filename, UPLOADED_PHOTO);
    assert_eq!(backend.uploaded_photo(), Some(("me.png".to_string(), 4)));
    assert_eq!(
        session.current().unwrap().unwrap().profile_image.as_deref(),
        Some(UPLOADED_PHOTO)
    );
    let event = other_tab.changed().await.unwrap();
    assert_eq!(event.kind, SessionChange::ProfileUpdated);
}

#[tokio::test]
async fn test_photo_upload_needs_a_session() {
    let backend = FakeBackend::start().await;
    let flow = ProfileFlow::new(backend.client(SessionStore::in_memory()));

    let err = flow
        .upload_photo(Upload::new("me.png", "image/png", vec![1]))
        .await
        .unwrap_err();

    assert_eq!(err.message, hris_portal::error::SIGNED_OUT_MESSAGE);
    assert_eq!(backend.uploaded_photo(), None);
}
