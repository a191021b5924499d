//! Change notification channel shared by every tab.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

/// Identifies the tab that published a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Origin(Uuid);

impl Origin {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of write triggered an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    /// Nothing has been published yet.
    Initial,
    SignedIn,
    ProfileUpdated,
    /// Form preferences (remembered or reset email) changed.
    Preferences,
    SignedOut,
}

/// The most recent change on the bus.
///
/// Carries no session data. Subscribers re-read storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    /// Increments by one per publish.
    pub revision: u64,
    /// `None` only for the initial value.
    pub origin: Option<Origin>,
    pub kind: SessionChange,
}

/// Broadcast channel for session changes.
#[derive(Clone)]
pub struct SessionBus {
    tx: Arc<watch::Sender<SessionEvent>>,
}

impl fmt::Debug for SessionBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBus")
            .field("revision", &self.tx.borrow().revision)
            .field("subscribers", &self.tx.receiver_count())
            .finish()
    }
}

impl Default for SessionBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBus {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SessionEvent {
            revision: 0,
            origin: None,
            kind: SessionChange::Initial,
        });
        Self { tx: Arc::new(tx) }
    }

    /// Subscribe to changes published after this call.
    #[must_use]
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub(crate) fn publish(&self, origin: Origin, kind: SessionChange) {
        self.tx.send_modify(|event| {
            event.revision += 1;
            event.origin = Some(origin);
            event.kind = kind;
        });
        debug!(%origin, ?kind, "Session change published");
    }
}

/// Receiving end of a [`SessionBus`].
///
/// Changes that arrive faster than the subscriber reads them collapse into
/// the latest one, which is enough because the payload is only a prompt to
/// re-read storage.
#[derive(Debug)]
pub struct SessionSubscription {
    rx: watch::Receiver<SessionEvent>,
}

impl SessionSubscription {
    /// Wait for the next change. `None` once every publisher is gone.
    pub async fn changed(&mut self) -> Option<SessionEvent> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Latest event without waiting.
    #[must_use]
    pub fn latest(&self) -> SessionEvent {
        self.rx.borrow().clone()
    }
}
