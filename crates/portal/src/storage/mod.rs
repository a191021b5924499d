//! Durable key/value storage for client state.
//!
//! The session lives in storage, not in memory: every component reads it from
//! here, and writers change it through [`KeyValueStore::apply`] so that a
//! multi-key update (login) or a wipe (logout) lands as one unit.
//!
//! - [`MemoryStore`] keeps entries in process memory (tests, embedding)
//! - [`FileStore`] persists entries as a JSON object on disk (CLI)

mod file;
mod memory;

use std::collections::BTreeMap;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a JSON object of strings.
    #[error("corrupt state file: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// A writer panicked while holding the store lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A single mutation inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Set(&'static str, String),
    Remove(&'static str),
}

impl Change {
    /// `Set` when a value is present, `Remove` otherwise.
    #[must_use]
    pub fn set_or_remove(key: &'static str, value: Option<String>) -> Self {
        match value {
            Some(value) => Self::Set(key, value),
            None => Self::Remove(key),
        }
    }
}

/// Synchronous durable key/value store.
///
/// Implementations must apply a batch atomically with respect to other
/// callers in the same process.
pub trait KeyValueStore: Send + Sync {
    /// Read one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Apply a batch of changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written; no change from the
    /// batch is visible in that case.
    fn apply(&self, changes: &[Change]) -> Result<(), StorageError>;

    /// Remove every entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn clear(&self) -> Result<(), StorageError>;

    /// Copy of all entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn entries(&self) -> Result<BTreeMap<String, String>, StorageError>;
}

/// Apply a batch to an in-memory map.
pub(crate) fn apply_to(map: &mut BTreeMap<String, String>, changes: &[Change]) {
    for change in changes {
        match change {
            Change::Set(key, value) => {
                map.insert((*key).to_string(), value.clone());
            }
            Change::Remove(key) => {
                map.remove(*key);
            }
        }
    }
}

/// Storage keys used by the portal.
pub mod keys {
    /// Bearer token; absence means signed out.
    pub const TOKEN: &str = "token";
    /// Role string as returned by the backend.
    pub const ROLE: &str = "role";
    /// Display name.
    pub const NAME: &str = "name";
    /// Profile photo filename (resolved to a URL by the avatar helper).
    pub const PROFILE_IMAGE: &str = "profile_image";
    /// Tenant company ID.
    pub const COMPANY_ID: &str = "companyId";
    /// `ACTIVE` or `EXPIRED`, recorded at login.
    pub const SUBSCRIPTION_STATUS: &str = "subscriptionStatus";
    /// Email pre-filled on the login form.
    pub const REMEMBER_EMAIL: &str = "rememberEmail";
    /// Email a password reset link was last sent to.
    pub const RESET_EMAIL: &str = "resetEmail";
}
