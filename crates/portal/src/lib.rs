//! HRIS Portal - headless client for the HR/payroll backend.
//!
//! This crate holds everything a front end needs except the drawing:
//!
//! - [`session`] - durable session store with a change bus shared by tabs
//! - [`navigation`] - routes, role menus, page guards and header search
//! - [`api`] - typed client for the backend REST API
//! - [`services`] - login, registration, password and profile flows
//! - [`sync`] - header and sidebar state kept current with the session
//! - [`fence`] - last-request-wins sequencing for overlapping queries
//!
//! # Session model
//!
//! Storage is the single source of truth. Every writer goes through
//! [`SessionStore`], which publishes on its [`SessionBus`] after each write;
//! readers re-derive their view from storage when they hear about it.
//!
//! The backend enforces authorization. Guards here only decide where to
//! send a visitor.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod avatar;
pub mod config;
pub mod error;
pub mod fence;
pub mod navigation;
pub mod services;
pub mod session;
pub mod storage;
pub mod sync;

pub use api::ApiClient;
pub use config::{ConfigError, PortalConfig};
pub use error::{FlowError, PortalError};
pub use session::{Session, SessionBus, SessionStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
