//! Role to permission mapping.
//!
//! Authorization is a pure lookup: a role grants a fixed set of permissions,
//! and a route that needs a role accepts any caller whose role is in that
//! role's permitted set. Both tables are `match` expressions so the compiler
//! flags a new role that has not been mapped.

use serde::{Deserialize, Serialize};

use super::status::AdminRole;

/// A capability a role may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Mark suggestions read/unread and delete them.
    ManageSuggestions,
    /// Create and update admin accounts.
    ManageAdmins,
    /// Read aggregate statistics.
    ViewStats,
}

/// Permissions granted to a role.
#[must_use]
pub const fn permissions_for(role: AdminRole) -> &'static [Permission] {
    match role {
        AdminRole::Admin => &[
            Permission::ManageSuggestions,
            Permission::ManageAdmins,
            Permission::ViewStats,
        ],
    }
}

/// Roles that satisfy a route requiring `required`.
#[must_use]
pub const fn permitted_roles(required: AdminRole) -> &'static [AdminRole] {
    match required {
        AdminRole::Admin => &[AdminRole::Admin],
    }
}

/// Whether a caller holding `role` may use a route that requires `required`.
#[must_use]
pub fn role_satisfies(required: AdminRole, role: AdminRole) -> bool {
    permitted_roles(required).contains(&role)
}

/// Whether `role` grants `permission`.
#[must_use]
pub fn role_has_permission(role: AdminRole, permission: Permission) -> bool {
    permissions_for(role).contains(&permission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_satisfies_admin() {
        assert!(role_satisfies(AdminRole::Admin, AdminRole::Admin));
    }

    #[test]
    fn test_admin_holds_every_permission() {
        for permission in [
            Permission::ManageSuggestions,
            Permission::ManageAdmins,
            Permission::ViewStats,
        ] {
            assert!(role_has_permission(AdminRole::Admin, permission));
        }
    }
}
