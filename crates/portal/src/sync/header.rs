//! Header: identity, notification bell and search box.

use std::sync::{Arc, Mutex};

use hris_core::Role;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::{TaskHandle, lock};
use crate::api::ApiClient;
use crate::api::users::Notification;
use crate::avatar::{self, ImageKind};
use crate::navigation::{self, Guard, routes};
use crate::session::Session;
use crate::storage::StorageError;

/// Notification panel state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

/// Who is signed in, as the header shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub role: Option<Role>,
    pub avatar_url: Option<String>,
    pub initial: char,
    pub title: &'static str,
    pub subtitle: &'static str,
}

impl Identity {
    fn from_session(session: &Session, asset_url: &Url) -> Self {
        let (title, subtitle) = match session.role {
            Some(Role::SuperAdmin) => ("Control Center", "System Root"),
            Some(Role::Admin) => ("Corporate Portal", "Management System"),
            Some(Role::Employee) | None => ("Corporate Portal", "Employee Network"),
        };
        Self {
            name: session.name.clone(),
            role: session.role,
            avatar_url: avatar::image_url(
                asset_url,
                ImageKind::Profile,
                session.profile_image.as_deref(),
            ),
            initial: avatar::initial(&session.name),
            title,
            subtitle,
        }
    }
}

/// Snapshot of everything the header draws.
#[derive(Debug, Clone, Default)]
pub struct HeaderState {
    pub identity: Option<Identity>,
    pub notifications: Vec<Notification>,
    pub panel: PanelState,
}

impl HeaderState {
    /// Whether the bell shows its unread dot.
    #[must_use]
    pub fn has_unread(&self) -> bool {
        self.notifications.iter().any(|n| !n.is_read)
    }

    /// Heading of the notification panel. Superadmins have no panel.
    #[must_use]
    pub fn panel_title(&self) -> Option<&'static str> {
        match self.identity.as_ref()?.role {
            Some(Role::SuperAdmin) => None,
            Some(Role::Admin) => Some("Company audit log"),
            Some(Role::Employee) | None => Some("My notifications"),
        }
    }
}

/// Keeps the header in step with the session.
#[derive(Debug)]
pub struct HeaderSync {
    api: ApiClient,
    asset_url: Url,
    state: Mutex<HeaderState>,
}

impl HeaderSync {
    #[must_use]
    pub fn new(api: ApiClient, asset_url: Url) -> Self {
        Self {
            api,
            asset_url,
            state: Mutex::new(HeaderState::default()),
        }
    }

    /// Current view state.
    #[must_use]
    pub fn state(&self) -> HeaderState {
        lock(&self.state).clone()
    }

    /// Re-read the session and refresh notifications.
    ///
    /// Returns [`Guard::Redirect`] to the login route when signed out.
    /// Notification fetch failures are logged and keep the previous list.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    #[instrument(skip(self))]
    pub async fn sync(&self) -> Result<Guard, StorageError> {
        let guard = navigation::protect(self.api.session())?;
        let Guard::Allow(session) = &guard else {
            *lock(&self.state) = HeaderState::default();
            return Ok(guard);
        };

        let identity = Identity::from_session(session, &self.asset_url);
        let fetch = identity.role.is_none_or(Role::has_notifications);
        {
            let mut state = lock(&self.state);
            state.identity = Some(identity);
            if !fetch {
                state.notifications.clear();
            }
        }

        if fetch {
            match self.api.notifications().await {
                Ok(notifications) => {
                    debug!(count = notifications.len(), "Notifications synced");
                    lock(&self.state).notifications = notifications;
                }
                Err(e) => warn!(error = %e, "Notification sync failed"),
            }
        }

        Ok(guard)
    }

    /// Open or close the notification panel.
    ///
    /// Opening marks everything read: local flags flip at once and one
    /// `PATCH` is sent. A failed `PATCH` is logged and the flags stay
    /// flipped. Nothing is sent when nothing is unread. Closing has no
    /// side effect.
    #[instrument(skip(self))]
    pub async fn toggle_panel(&self) -> PanelState {
        let unread = {
            let mut state = lock(&self.state);
            match state.panel {
                PanelState::Open => {
                    state.panel = PanelState::Closed;
                    return PanelState::Closed;
                }
                PanelState::Closed => {
                    state.panel = PanelState::Open;
                    let unread = state.notifications.iter().filter(|n| !n.is_read).count();
                    for notification in &mut state.notifications {
                        notification.is_read = true;
                    }
                    unread
                }
            }
        };

        if unread > 0 {
            match self.api.mark_notifications_read().await {
                Ok(()) => info!(unread, "Notifications marked read"),
                Err(e) => warn!(error = %e, unread, "Mark-as-read failed; keeping local state"),
            }
        }
        PanelState::Open
    }

    /// Route for a header search, if the query matches anything.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn search(&self, query: &str) -> Result<Option<&'static str>, StorageError> {
        let role = self
            .api
            .session()
            .current()?
            .and_then(|s| s.role)
            .unwrap_or(Role::Employee);
        Ok(navigation::search_route(role, query))
    }

    /// Where the logo click goes.
    #[must_use]
    pub fn home_route(&self) -> &'static str {
        lock(&self.state)
            .identity
            .as_ref()
            .map_or(routes::LOGIN, |identity| {
                routes::dashboard_redirect(identity.role)
            })
    }

    /// Sync now, then again after every session change on the bus.
    #[must_use]
    pub fn spawn(self: Arc<Self>) -> TaskHandle {
        let mut changes = self.api.session().subscribe();
        TaskHandle::new(tokio::spawn(async move {
            loop {
                if let Err(e) = self.sync().await {
                    warn!(error = %e, "Header sync failed");
                }
                let Some(event) = changes.changed().await else {
                    break;
                };
                debug!(origin = ?event.origin, kind = ?event.kind, "Header resync");
            }
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use hris_core::NotificationId;

    use super::*;

    fn notification(id: i64, is_read: bool) -> Notification {
        Notification {
            id: NotificationId::new(id),
            title: "Leave".to_string(),
            message: "Approved".to_string(),
            is_read,
            created_at: Utc::now(),
        }
    }

    fn identity(role: Option<Role>) -> Identity {
        Identity {
            name: "Sari".to_string(),
            role,
            avatar_url: None,
            initial: 'S',
            title: "",
            subtitle: "",
        }
    }

    #[test]
    fn test_panel_titles() {
        let mut state = HeaderState::default();
        assert_eq!(state.panel_title(), None);
        state.identity = Some(identity(Some(Role::Admin)));
        assert_eq!(state.panel_title(), Some("Company audit log"));
        state.identity = Some(identity(Some(Role::Employee)));
        assert_eq!(state.panel_title(), Some("My notifications"));
        state.identity = Some(identity(Some(Role::SuperAdmin)));
        assert_eq!(state.panel_title(), None);
    }

    #[test]
    fn test_unread_indicator() {
        let mut state = HeaderState {
            notifications: vec![notification(1, true), notification(2, true)],
            ..HeaderState::default()
        };
        assert!(!state.has_unread());
        state.notifications.push(notification(3, false));
        assert!(state.has_unread());
    }
}
