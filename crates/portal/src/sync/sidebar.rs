//! Sidebar: role menu plus polled badges.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use hris_core::Role;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, instrument, warn};

use super::{TaskHandle, lock};
use crate::api::ApiClient;
use crate::navigation::{BadgeState, MenuItem, menu_for_stored};
use crate::session::SessionChange;
use crate::storage::StorageError;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Shortest badge polling period.
pub const MIN_POLL_PERIOD: Duration = Duration::from_millis(10);

/// Whole days until `end`, rounded up. Negative once `end` has passed.
#[must_use]
pub fn days_left(end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (end - now).num_milliseconds();
    let days = millis / MILLIS_PER_DAY;
    if millis % MILLIS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}

#[derive(Debug, Default)]
struct SidebarState {
    badges: BadgeState,
    path: String,
}

/// Keeps the sidebar menu and its badges current.
#[derive(Debug)]
pub struct SidebarSync {
    api: ApiClient,
    state: Mutex<SidebarState>,
}

impl SidebarSync {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Mutex::new(SidebarState::default()),
        }
    }

    /// Current badge inputs.
    #[must_use]
    pub fn badges(&self) -> BadgeState {
        lock(&self.state).badges.clone()
    }

    /// Menu for the stored role. Empty when signed out or when the stored
    /// role is not recognised.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn menu(&self) -> Result<Vec<MenuItem>, StorageError> {
        let session = self.api.session();
        if !session.is_authenticated()? {
            return Ok(Vec::new());
        }
        let Some(role) = session.stored_role()? else {
            return Ok(Vec::new());
        };
        Ok(menu_for_stored(&role, &self.badges()))
    }

    /// Key of the menu item highlighted for the current path.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn active_key(&self) -> Result<Option<&'static str>, StorageError> {
        let Some(role) = self.api.session().current()?.and_then(|s| s.role) else {
            return Ok(None);
        };
        let path = lock(&self.state).path.clone();
        Ok(self
            .menu()?
            .into_iter()
            .find(|item| item.is_active(role, &path))
            .map(|item| item.key))
    }

    /// Record a navigation. Visiting any leave page hides the pending
    /// count until a later poll reports pending requests again.
    pub fn on_navigate(&self, path: &str) {
        let mut state = lock(&self.state);
        state.path = path.to_string();
        if path.contains("/leaves") {
            state.badges.show_leave_count = false;
        }
    }

    /// Poll the badge endpoints once.
    ///
    /// Only admins have polled badges. The two requests run concurrently;
    /// each failure is logged and leaves its badge at the previous value.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        let role = match self.api.session().current() {
            Ok(Some(session)) => session.role,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "Sidebar could not read the session");
                return;
            }
        };
        if role != Some(Role::Admin) {
            return;
        }

        let (summary, me) = tokio::join!(self.api.leave_summary(), self.api.me());
        let now = Utc::now();
        let mut state = lock(&self.state);

        match summary {
            Ok(summary) => {
                state.badges.pending_leaves = summary.pending;
                state.badges.show_leave_count = summary.pending > 0;
            }
            Err(e) => warn!(error = %e, "Leave summary unavailable; keeping last count"),
        }

        match me {
            Ok(me) => {
                if let Some(end) = me.subscription_end() {
                    state.badges.days_left = Some(days_left(end, now));
                }
            }
            Err(e) => warn!(error = %e, "Subscription status unavailable; keeping last value"),
        }

        debug!(badges = ?state.badges, "Sidebar badges refreshed");
    }

    fn reset(&self) {
        lock(&self.state).badges = BadgeState::default();
    }

    /// Refresh now and then every `period` until the handle is dropped.
    /// A sign-in or sign-out on the bus resets the badges and refreshes
    /// immediately. Periods below [`MIN_POLL_PERIOD`] are raised to it.
    #[must_use]
    pub fn spawn_polling(self: Arc<Self>, period: Duration) -> TaskHandle {
        let mut changes = self.api.session().subscribe();
        let mut ticker = time::interval(period.max(MIN_POLL_PERIOD));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        TaskHandle::new(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = ticker.tick() => self.refresh().await,
                    event = changes.changed() => match event {
                        Some(event)
                            if matches!(event.kind, SessionChange::SignedIn | SessionChange::SignedOut) =>
                        {
                            self.reset();
                            self.refresh().await;
                        }
                        Some(_) => {}
                        None => break,
                    },
                }
            }
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::config::PortalConfig;
    use crate::session::SessionStore;
    use crate::storage::{MemoryStore, keys};

    #[test]
    fn test_days_left_rounds_up() {
        let now = Utc::now();
        assert_eq!(days_left(now + TimeDelta::hours(1), now), 1);
        assert_eq!(days_left(now + TimeDelta::days(3), now), 3);
        assert_eq!(days_left(now + TimeDelta::days(3) + TimeDelta::minutes(1), now), 4);
        assert_eq!(days_left(now, now), 0);
        assert_eq!(days_left(now - TimeDelta::hours(36), now), -1);
    }

    fn sidebar(entries: &[(&'static str, &'static str)]) -> SidebarSync {
        let store = SessionStore::new(Arc::new(MemoryStore::with_entries(
            entries.iter().copied(),
        )));
        let config = PortalConfig::for_api_url("http://127.0.0.1:9/api").unwrap();
        SidebarSync::new(ApiClient::new(&config, store).unwrap())
    }

    #[test]
    fn test_menu_follows_stored_role() {
        let admin = sidebar(&[(keys::TOKEN, "t"), (keys::ROLE, "Admin")]);
        assert_eq!(admin.menu().unwrap().len(), 6);

        let unknown = sidebar(&[(keys::TOKEN, "t"), (keys::ROLE, "auditor")]);
        assert!(unknown.menu().unwrap().is_empty());

        let signed_out = sidebar(&[(keys::ROLE, "admin")]);
        assert!(signed_out.menu().unwrap().is_empty());
    }

    #[test]
    fn test_leave_pages_hide_count() {
        let sync = sidebar(&[(keys::TOKEN, "t"), (keys::ROLE, "admin")]);
        lock(&sync.state).badges = BadgeState {
            pending_leaves: 2,
            show_leave_count: true,
            ..BadgeState::default()
        };

        sync.on_navigate("/dashboard/admin/payroll");
        assert!(sync.badges().show_leave_count);
        assert_eq!(sync.active_key().unwrap(), Some("pay"));

        sync.on_navigate("/dashboard/admin/leaves");
        assert!(!sync.badges().show_leave_count);
        assert_eq!(sync.menu().unwrap()[3].count, None);
    }

    #[tokio::test]
    async fn test_failed_poll_keeps_previous_badges() {
        let sync = sidebar(&[(keys::TOKEN, "t"), (keys::ROLE, "admin")]);
        let before = BadgeState {
            pending_leaves: 5,
            show_leave_count: true,
            days_left: Some(6),
            show_payslip_badge: false,
        };
        lock(&sync.state).badges = before.clone();

        sync.refresh().await;
        assert_eq!(sync.badges(), before);
    }

    #[tokio::test]
    async fn test_zero_period_is_raised_to_minimum() {
        let sync = Arc::new(sidebar(&[]));
        let task = Arc::clone(&sync).spawn_polling(Duration::ZERO);
        time::sleep(MIN_POLL_PERIOD * 3).await;
        drop(task);
        assert_eq!(sync.badges(), BadgeState::default());
    }
}
