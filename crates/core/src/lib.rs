//! Suggestion Box Core - Shared domain types.
//!
//! This crate provides the types used across all suggestion box components:
//! - `server` - REST service for submitting and moderating suggestions
//! - `cli` - Command-line tools for migrations, seeding and admin management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. The role/permission check and the suggestion label
//! arithmetic live here so they can be tested without a running store.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, labels, statuses and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
