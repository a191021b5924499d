//! Header and sidebar state kept in step with the session.
//!
//! Both components re-derive their view from storage whenever the session
//! bus reports a change. Background work runs on a tokio task owned by a
//! [`TaskHandle`]; dropping the handle stops it.

mod header;
mod logs;
mod sidebar;

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

pub use header::{HeaderState, HeaderSync, Identity, PanelState};
pub use logs::LogSearch;
pub use sidebar::{MIN_POLL_PERIOD, SidebarSync, days_left};

/// Owns a background task and aborts it on drop.
#[derive(Debug)]
pub struct TaskHandle(JoinHandle<()>);

impl TaskHandle {
    pub(crate) const fn new(handle: JoinHandle<()>) -> Self {
        Self(handle)
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// View state is plain data, so a panic mid-update leaves nothing
/// half-invariant worth refusing to read.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
