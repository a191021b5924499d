//! Page guard.
//!
//! Advisory only: the backend enforces access on every request.

use crate::session::{Session, SessionStore};
use crate::storage::StorageError;

use super::routes;

/// Outcome of checking a protected page.
#[derive(Debug, Clone)]
pub enum Guard {
    /// A session is present.
    Allow(Box<Session>),
    /// Send the visitor elsewhere.
    Redirect(&'static str),
}

/// Check a protected page: no token means a trip to the login route.
///
/// # Errors
///
/// Returns an error if storage cannot be read.
pub fn protect(store: &SessionStore) -> Result<Guard, StorageError> {
    Ok(match store.current()? {
        Some(session) => Guard::Allow(Box::new(session)),
        None => Guard::Redirect(routes::LOGIN),
    })
}

/// Resolve `/dashboard` to the role's landing route.
///
/// # Errors
///
/// Returns an error if storage cannot be read.
pub fn dashboard_root(store: &SessionStore) -> Result<&'static str, StorageError> {
    Ok(match store.current()? {
        Some(session) => routes::dashboard_redirect(session.role),
        None => routes::LOGIN,
    })
}
