//! Observable session store.
//!
//! The session is kept in durable storage and nowhere else. Components read
//! it with [`SessionStore::current`] whenever they need it. Every write made
//! through the store is followed by a publish on the [`SessionBus`], and
//! subscribers react by re-reading storage. Any number of store handles
//! ("tabs") can share one bus, so a change made in one tab reaches
//! components mounted in every other tab through the same channel.

mod bus;

use std::fmt;
use std::sync::Arc;

use hris_core::{Role, SubscriptionStatus};
use secrecy::SecretString;
use tracing::{info, instrument, warn};

pub use bus::{Origin, SessionBus, SessionChange, SessionEvent, SessionSubscription};

use crate::storage::{Change, KeyValueStore, MemoryStore, StorageError, keys};

/// Name shown in the header when none is stored.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// Snapshot of the signed-in identity, read from storage.
#[derive(Clone)]
pub struct Session {
    /// Bearer credential.
    pub token: SecretString,
    /// Parsed role. `None` when the stored role is missing or unrecognised.
    pub role: Option<Role>,
    /// Display name.
    pub name: String,
    /// Profile photo filename.
    pub profile_image: Option<String>,
    /// Tenant company ID.
    pub company_id: Option<String>,
    /// Subscription state recorded at login.
    pub subscription: Option<SubscriptionStatus>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("role", &self.role)
            .field("name", &self.name)
            .field("profile_image", &self.profile_image)
            .field("company_id", &self.company_id)
            .field("subscription", &self.subscription)
            .finish()
    }
}

/// Identity written at login.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub token: String,
    pub role: String,
    pub name: String,
    pub profile_image: Option<String>,
    pub company_id: Option<String>,
    pub subscription: SubscriptionStatus,
}

/// Handle on the durable session plus the bus its changes are published on.
///
/// Cloning yields a handle for the same tab. Use [`SessionStore::tab`] for a
/// handle that shares storage and bus but publishes under its own origin.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    bus: SessionBus,
    origin: Origin,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a store with a fresh bus.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::join(storage, SessionBus::new())
    }

    /// Create a store backed by process memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Attach to an existing bus.
    #[must_use]
    pub fn join(storage: Arc<dyn KeyValueStore>, bus: SessionBus) -> Self {
        Self {
            storage,
            bus,
            origin: Origin::new(),
        }
    }

    /// Open another tab on the same storage and bus.
    #[must_use]
    pub fn tab(&self) -> Self {
        Self::join(Arc::clone(&self.storage), self.bus.clone())
    }

    /// Identifier stamped on events this handle publishes.
    #[must_use]
    pub const fn origin(&self) -> Origin {
        self.origin
    }

    /// The bus this store publishes on.
    #[must_use]
    pub const fn bus(&self) -> &SessionBus {
        &self.bus
    }

    /// Subscribe to session changes from every tab on the bus.
    #[must_use]
    pub fn subscribe(&self) -> SessionSubscription {
        self.bus.subscribe()
    }

    /// Read the current session. `None` when no token is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn current(&self) -> Result<Option<Session>, StorageError> {
        let entries = self.storage.entries()?;
        let Some(token) = entries.get(keys::TOKEN).filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        let role = match entries.get(keys::ROLE) {
            Some(raw) => raw
                .parse::<Role>()
                .inspect_err(|e| warn!(error = %e, "Stored role not recognised"))
                .ok(),
            None => None,
        };

        let subscription = match entries.get(keys::SUBSCRIPTION_STATUS).map(String::as_str) {
            Some("ACTIVE") => Some(SubscriptionStatus::Active),
            Some("EXPIRED") => Some(SubscriptionStatus::Expired),
            _ => None,
        };

        Ok(Some(Session {
            token: SecretString::from(token.clone()),
            role,
            name: entries
                .get(keys::NAME)
                .filter(|n| !n.is_empty())
                .cloned()
                .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
            profile_image: non_empty(entries.get(keys::PROFILE_IMAGE)),
            company_id: non_empty(entries.get(keys::COMPANY_ID)),
            subscription,
        }))
    }

    /// Read the stored bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn token(&self) -> Result<Option<SecretString>, StorageError> {
        Ok(self
            .storage
            .get(keys::TOKEN)?
            .filter(|t| !t.is_empty())
            .map(SecretString::from))
    }

    /// Raw stored role string, as written by the last login.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn stored_role(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(keys::ROLE)
    }

    /// Whether a token is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn is_authenticated(&self) -> Result<bool, StorageError> {
        Ok(self.token()?.is_some())
    }

    /// Record a fresh login.
    ///
    /// `remember_email` is kept for pre-filling the login form; `None`
    /// forgets any previously remembered address.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    #[instrument(skip(self, session, remember_email), fields(role = %session.role))]
    pub fn establish(
        &self,
        session: NewSession,
        remember_email: Option<&str>,
    ) -> Result<(), StorageError> {
        let changes = [
            Change::Set(keys::TOKEN, session.token),
            Change::Set(keys::ROLE, session.role),
            Change::Set(keys::NAME, session.name),
            Change::set_or_remove(keys::PROFILE_IMAGE, session.profile_image),
            Change::Set(keys::COMPANY_ID, session.company_id.unwrap_or_default()),
            Change::Set(
                keys::SUBSCRIPTION_STATUS,
                session.subscription.as_str().to_string(),
            ),
            Change::set_or_remove(keys::REMEMBER_EMAIL, remember_email.map(str::to_owned)),
        ];
        self.write(&changes, SessionChange::SignedIn)?;
        info!("Session established");
        Ok(())
    }

    /// Update the displayed identity after a profile edit.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn update_identity(
        &self,
        name: Option<String>,
        profile_image: Option<String>,
    ) -> Result<(), StorageError> {
        let changes: Vec<Change> = [
            name.map(|n| Change::Set(keys::NAME, n)),
            profile_image.map(|p| Change::Set(keys::PROFILE_IMAGE, p)),
        ]
        .into_iter()
        .flatten()
        .collect();

        if changes.is_empty() {
            return Ok(());
        }
        self.write(&changes, SessionChange::ProfileUpdated)
    }

    /// Email to pre-fill on the login form.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn remembered_email(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(keys::REMEMBER_EMAIL)
    }

    /// Remember (or forget) the address a reset link was sent to.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn set_reset_email(&self, email: Option<&str>) -> Result<(), StorageError> {
        self.write(
            &[Change::set_or_remove(
                keys::RESET_EMAIL,
                email.map(str::to_owned),
            )],
            SessionChange::Preferences,
        )
    }

    /// Address a reset link was last sent to.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn reset_email(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(keys::RESET_EMAIL)
    }

    /// Wipe every stored key (logout).
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.clear()?;
        self.bus.publish(self.origin, SessionChange::SignedOut);
        info!("Session cleared");
        Ok(())
    }

    fn write(&self, changes: &[Change], kind: SessionChange) -> Result<(), StorageError> {
        self.storage.apply(changes)?;
        self.bus.publish(self.origin, kind);
        Ok(())
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .filter(|v| !v.is_empty() && v.as_str() != "null")
        .cloned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn new_session(role: &str) -> NewSession {
        NewSession {
            token: "jwt-abc".to_string(),
            role: role.to_string(),
            name: "Dewi".to_string(),
            profile_image: None,
            company_id: Some("12".to_string()),
            subscription: SubscriptionStatus::Active,
        }
    }

    #[test]
    fn test_empty_store_is_signed_out() {
        let store = SessionStore::in_memory();
        assert!(store.current().unwrap().is_none());
        assert!(!store.is_authenticated().unwrap());
    }

    #[test]
    fn test_establish_then_read() {
        let store = SessionStore::in_memory();
        store
            .establish(new_session("Admin"), Some("dewi@acme.co.id"))
            .unwrap();

        let session = store.current().unwrap().unwrap();
        assert_eq!(session.token.expose_secret(), "jwt-abc");
        assert_eq!(session.role, Some(Role::Admin));
        assert_eq!(session.name, "Dewi");
        assert_eq!(session.company_id.as_deref(), Some("12"));
        assert_eq!(session.subscription, Some(SubscriptionStatus::Active));
        assert_eq!(
            store.remembered_email().unwrap().as_deref(),
            Some("dewi@acme.co.id")
        );
    }

    #[test]
    fn test_unknown_role_reads_as_none() {
        let store = SessionStore::in_memory();
        store.establish(new_session("intern"), None).unwrap();
        let session = store.current().unwrap().unwrap();
        assert_eq!(session.role, None);
        assert_eq!(store.stored_role().unwrap().as_deref(), Some("intern"));
    }

    #[test]
    fn test_missing_name_defaults() {
        let store = SessionStore::new(Arc::new(MemoryStore::with_entries([(
            keys::TOKEN,
            "t",
        )])));
        let session = store.current().unwrap().unwrap();
        assert_eq!(session.name, DEFAULT_DISPLAY_NAME);
        assert_eq!(session.role, None);
    }

    #[test]
    fn test_null_profile_image_is_none() {
        let store = SessionStore::new(Arc::new(MemoryStore::with_entries([
            (keys::TOKEN, "t"),
            (keys::PROFILE_IMAGE, "null"),
        ])));
        assert!(store.current().unwrap().unwrap().profile_image.is_none());
    }

    #[test]
    fn test_clear_wipes_every_key() {
        let store = SessionStore::in_memory();
        store.establish(new_session("employee"), Some("a@b.co")).unwrap();
        store.set_reset_email(Some("a@b.co")).unwrap();
        store.clear().unwrap();

        assert!(store.current().unwrap().is_none());
        assert!(store.remembered_email().unwrap().is_none());
        assert!(store.reset_email().unwrap().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let store = SessionStore::in_memory();
        store.establish(new_session("employee"), None).unwrap();
        let debug = format!("{:?}", store.current().unwrap().unwrap());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("jwt-abc"));
    }

    #[test]
    fn test_update_identity_without_changes_is_silent() {
        let store = SessionStore::in_memory();
        let sub = store.subscribe();
        store.update_identity(None, None).unwrap();
        assert_eq!(sub.latest().revision, 0);
    }

    #[tokio::test]
    async fn test_change_in_one_tab_reaches_another() {
        let first = SessionStore::in_memory();
        let second = first.tab();
        let mut sub = first.subscribe();

        second.establish(new_session("employee"), None).unwrap();
        second
            .update_identity(Some("Dewi Lestari".to_string()), None)
            .unwrap();

        let event = sub.changed().await.unwrap();
        assert_eq!(event.origin, Some(second.origin()));
        assert_eq!(event.kind, SessionChange::ProfileUpdated);
        assert_eq!(first.current().unwrap().unwrap().name, "Dewi Lestari");
    }

    #[tokio::test]
    async fn test_same_tab_writes_are_published() {
        let store = SessionStore::in_memory();
        let mut sub = store.subscribe();
        store.clear().unwrap();
        let event = sub.changed().await.unwrap();
        assert_eq!(event.origin, Some(store.origin()));
        assert_eq!(event.kind, SessionChange::SignedOut);
    }
}
