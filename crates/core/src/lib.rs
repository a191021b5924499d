//! HRIS Core - Shared types library.
//!
//! This crate provides common types used across all HRIS portal components:
//! - `portal` - Headless client: session store, navigation, REST client
//! - `cli` - Command-line front end for the portal
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, email addresses, the role enum and record statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
