//! User flows built on the API client and the session store.
//!
//! Flows validate input before any request, persist what the backend
//! returns and report failures as a single user-facing line
//! ([`FlowError`](crate::error::FlowError)).

pub mod auth;
pub mod profile;

pub use auth::{AuthFlow, LoginForm, RegisterForm};
pub use profile::ProfileFlow;
