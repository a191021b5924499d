//! Last-request-wins sequencing for overlapping queries.
//!
//! Each query takes a [`Ticket`] before it is sent. When its response
//! arrives it is applied only if no newer ticket has been issued since, so
//! a slow stale response can never overwrite a fresher one.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

/// Sequence number of an issued query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Issues monotonically increasing tickets.
#[derive(Debug, Default)]
pub struct QueryFence {
    latest: AtomicU64,
}

impl QueryFence {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    /// Take a ticket for a query about to be sent. Every earlier ticket
    /// becomes stale.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the most recently issued one.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// The value currently on display, guarded by a fence.
#[derive(Debug, Default)]
pub struct Latest<T> {
    fence: QueryFence,
    value: Mutex<Option<T>>,
}

impl<T: Clone> Latest<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fence: QueryFence::new(),
            value: Mutex::new(None),
        }
    }

    /// Take a ticket for a new query.
    pub fn issue(&self) -> Ticket {
        self.fence.issue()
    }

    /// Store `value` if `ticket` is still current. Returns whether it was
    /// applied.
    pub fn apply(&self, ticket: Ticket, value: T) -> bool {
        let Ok(mut slot) = self.value.lock() else {
            return false;
        };
        if !self.fence.is_current(ticket) {
            debug!(ticket = ticket.0, "Discarding stale response");
            return false;
        }
        *slot = Some(value);
        true
    }

    /// The value last applied.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.value.lock().ok().and_then(|slot| slot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_increase() {
        let fence = QueryFence::new();
        let first = fence.issue();
        let second = fence.issue();
        assert!(second > first);
        assert!(!fence.is_current(first));
        assert!(fence.is_current(second));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let latest = Latest::new();
        let old = latest.issue();
        let new = latest.issue();

        assert!(latest.apply(new, "fresh"));
        assert!(!latest.apply(old, "stale"));
        assert_eq!(latest.get(), Some("fresh"));
    }

    #[test]
    fn test_nothing_applied_yet() {
        let latest: Latest<u8> = Latest::new();
        let _ = latest.issue();
        assert_eq!(latest.get(), None);
    }
}
