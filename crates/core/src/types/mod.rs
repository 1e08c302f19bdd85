//! Core types for the suggestion box.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod hash;
pub mod id;
pub mod permission;
pub mod status;

pub use category::{Category, CategoryError};
pub use email::{Email, EmailError};
pub use hash::{HashError, SuggestionHash};
pub use id::*;
pub use permission::{
    Permission, permissions_for, permitted_roles, role_has_permission, role_satisfies,
};
pub use status::*;
