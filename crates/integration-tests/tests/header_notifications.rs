//! Header sync and the notification panel's mark-as-read behavior.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use hris_integration_tests::FakeBackend;
use hris_portal::SessionStore;
use hris_portal::api::users::ProfileUpdate;
use hris_portal::navigation::{Guard, routes};
use hris_portal::services::ProfileFlow;
use hris_portal::sync::{HeaderSync, PanelState};

fn header(backend: &FakeBackend, session: SessionStore) -> HeaderSync {
    HeaderSync::new(backend.client(session), backend.config().asset_url)
}

// =============================================================================
// Opening the panel
// =============================================================================

#[tokio::test]
async fn test_opening_panel_sends_one_patch_and_marks_all_read() {
    let backend = FakeBackend::start().await;
    backend.set_notifications(&[("Cuti disetujui", false), ("Slip gaji", false), ("Lama", true)]);
    let session = backend.sign_in("budi@maju.co.id").await;
    let header = header(&backend, session);
    header.sync().await.unwrap();
    assert!(header.state().has_unread());

    assert_eq!(header.toggle_panel().await, PanelState::Open);

    let state = header.state();
    assert_eq!(state.panel, PanelState::Open);
    assert!(state.notifications.iter().all(|n| n.is_read));
    assert!(!state.has_unread());
    assert_eq!(backend.mark_read_calls(), 1);
    assert_eq!(backend.stored_read_flags(), vec![true, true, true]);
}

#[tokio::test]
async fn test_failed_patch_keeps_local_flags_flipped() {
    let backend = FakeBackend::start().await;
    backend.set_notifications(&[("Cuti disetujui", false)]);
    backend.state().fail_mark_read.store(true, Ordering::SeqCst);
    let session = backend.sign_in("budi@maju.co.id").await;
    let header = header(&backend, session);
    header.sync().await.unwrap();

    header.toggle_panel().await;

    assert_eq!(backend.mark_read_calls(), 1);
    assert!(!header.state().has_unread());
    assert_eq!(backend.stored_read_flags(), vec![false]);

    // The next sync shows the server's view again.
    header.sync().await.unwrap();
    assert!(header.state().has_unread());
}

#[tokio::test]
async fn test_nothing_unread_sends_no_patch() {
    let backend = FakeBackend::start().await;
    backend.set_notifications(&[("Lama", true)]);
    let session = backend.sign_in("budi@maju.co.id").await;
    let header = header(&backend, session);
    header.sync().await.unwrap();

    header.toggle_panel().await;

    assert_eq!(backend.mark_read_calls(), 0);
}

#[tokio::test]
async fn test_closing_panel_has_no_side_effect() {
    let backend = FakeBackend::start().await;
    backend.set_notifications(&[("Cuti disetujui", false)]);
    let session = backend.sign_in("admin@maju.co.id").await;
    let header = header(&backend, session);
    header.sync().await.unwrap();

    assert_eq!(header.toggle_panel().await, PanelState::Open);
    assert_eq!(header.toggle_panel().await, PanelState::Closed);
    assert_eq!(header.toggle_panel().await, PanelState::Open);

    assert_eq!(backend.mark_read_calls(), 1);
    assert_eq!(header.state().panel_title(), Some("Company audit log"));
}

// =============================================================================
// Sync
// =============================================================================

#[tokio::test]
async fn test_superadmin_header_skips_notifications() {
    let backend = FakeBackend::start().await;
    backend.set_notifications(&[("Cuti disetujui", false)]);
    let session = backend.sign_in("super@platform.id").await;
    let header = header(&backend, session);

    header.sync().await.unwrap();

    let state = header.state();
    assert_eq!(backend.state().notification_calls.load(Ordering::SeqCst), 0);
    assert!(state.notifications.is_empty());
    assert_eq!(state.panel_title(), None);
    let identity = state.identity.unwrap();
    assert_eq!(identity.title, "Control Center");
    assert_eq!(header.home_route(), routes::SUPERADMIN_HOME);
}

#[tokio::test]
async fn test_signed_out_header_redirects_to_login() {
    let backend = FakeBackend::start().await;
    let header = header(&backend, SessionStore::in_memory());

    let guard = header.sync().await.unwrap();

    assert!(matches!(guard, Guard::Redirect(routes::LOGIN)));
    assert!(header.state().identity.is_none());
    assert_eq!(backend.state().notification_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_identity_shows_name_photo_and_initial() {
    let backend = FakeBackend::start().await;
    let session = backend.sign_in("budi@maju.co.id").await;
    let header = header(&backend, session);

    header.sync().await.unwrap();

    let identity = header.state().identity.unwrap();
    assert_eq!(identity.name, "budi user");
    assert_eq!(identity.initial, 'B');
    assert!(
        identity
            .avatar_url
            .unwrap()
            .ends_with("/public/profiles/avatar.png")
    );
}

// =============================================================================
// Cross-tab propagation
// =============================================================================

#[tokio::test]
async fn test_profile_update_in_one_tab_refreshes_header_in_another() {
    let backend = FakeBackend::start().await;
    let session = backend.sign_in("budi@maju.co.id").await;
    let other_tab = session.tab();

    let header = Arc::new(header(&backend, other_tab));
    let _task = Arc::clone(&header).spawn();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(header.state().identity.unwrap().name, "budi user");

    let update = ProfileUpdate {
        name: Some("Budi Santoso".to_string()),
        ..ProfileUpdate::default()
    };
    ProfileFlow::new(backend.client(session))
        .update(&update)
        .await
        .unwrap();

    let mut name = String::new();
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        if let Some(identity) = header.state().identity {
            name = identity.name;
            if name == "Budi Santoso" {
                break;
            }
        }
    }
    assert_eq!(name, "Budi Santoso");
}

#[tokio::test]
async fn test_sign_out_in_one_tab_clears_header_in_another() {
    let backend = FakeBackend::start().await;
    let session = backend.sign_in("admin@maju.co.id").await;
    let header = Arc::new(header(&backend, session.tab()));
    let _task = Arc::clone(&header).spawn();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(header.state().identity.is_some());

    session.clear().unwrap();

    let mut cleared = false;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        if header.state().identity.is_none() {
            cleared = true;
            break;
        }
    }
    assert!(cleared);
    assert_eq!(header.home_route(), routes::LOGIN);
}
