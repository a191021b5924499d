//! Audit search shows only the newest query's results.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use hris_core::Role;
use hris_integration_tests::FakeBackend;
use hris_portal::sync::LogSearch;

#[tokio::test]
async fn test_slow_older_query_is_discarded() {
    let backend = FakeBackend::start().await;
    backend.delay_audit("pay", Duration::from_millis(300));
    let session = backend.sign_in("admin@maju.co.id").await;
    let search = Arc::new(LogSearch::new(backend.client(session)));

    let slow = tokio::spawn({
        let search = Arc::clone(&search);
        async move { search.search(Role::Admin, "pay").await.unwrap() }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    let fast_applied = search.search(Role::Admin, "payroll").await.unwrap();
    let slow_applied = slow.await.unwrap();

    assert!(fast_applied);
    assert!(!slow_applied);
    let (query, entries) = search.shown().unwrap();
    assert_eq!(query, "payroll");
    assert_eq!(entries[0].action, "me:payroll");
}

#[tokio::test]
async fn test_superadmin_searches_system_feed() {
    let backend = FakeBackend::start().await;
    let session = backend.sign_in("super@platform.id").await;
    let search = LogSearch::new(backend.client(session));

    assert!(search.search(Role::SuperAdmin, "suspend").await.unwrap());

    let (_, entries) = search.shown().unwrap();
    assert_eq!(entries[0].action, "system:suspend");
}

#[tokio::test]
async fn test_failed_search_keeps_previous_results() {
    let backend = FakeBackend::start().await;
    let session = backend.sign_in("admin@maju.co.id").await;
    let search = LogSearch::new(backend.client(session.clone()));
    search.search(Role::Admin, "cuti").await.unwrap();

    session.clear().unwrap();
    assert!(search.search(Role::Admin, "gaji").await.is_err());

    assert_eq!(search.shown().unwrap().0, "cuti");
}
