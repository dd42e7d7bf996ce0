//! Well-known role names and permission codes.
//!
//! These must match the seed data in `20260301000003_seed_roles_permissions.sql`.

/// Full access; bypasses permission checks and cannot be deleted.
pub const ROLE_SUPER_ADMIN: &str = "SUPER_ADMIN";
pub const ROLE_STATE_ADMIN: &str = "STATE_ADMIN";
pub const ROLE_CITY_ADMIN: &str = "CITY_ADMIN";
pub const ROLE_VIEWER: &str = "VIEWER";

// ---------------------------------------------------------------------------
// Permission codes
// ---------------------------------------------------------------------------

pub const PERM_DASHBOARD_VIEW: &str = "DASHBOARD_VIEW";
pub const PERM_ADMIN_VIEW: &str = "ADMIN_VIEW";
pub const PERM_ADMIN_MANAGE: &str = "ADMIN_MANAGE";
pub const PERM_ROLE_VIEW: &str = "ROLE_VIEW";
pub const PERM_ROLE_MANAGE: &str = "ROLE_MANAGE";
pub const PERM_PERMISSION_VIEW: &str = "PERMISSION_VIEW";
pub const PERM_PERMISSION_MANAGE: &str = "PERMISSION_MANAGE";
pub const PERM_LOCATION_VIEW: &str = "LOCATION_VIEW";
pub const PERM_LOCATION_MANAGE: &str = "LOCATION_MANAGE";
pub const PERM_ONBOARDING_VIEW: &str = "ONBOARDING_VIEW";
pub const PERM_SCREENING_VIEW: &str = "SCREENING_VIEW";
pub const PERM_SCREENING_MANAGE: &str = "SCREENING_MANAGE";
pub const PERM_TRAINING_VIEW: &str = "TRAINING_VIEW";
pub const PERM_TRAINING_MANAGE: &str = "TRAINING_MANAGE";
pub const PERM_NOTIFICATION_VIEW: &str = "NOTIFICATION_VIEW";

/// Whether a principal with `role` and the granted `permissions` may
/// perform an action guarded by `required`.
///
/// `SUPER_ADMIN` is always allowed, even for codes added after its token
/// was issued.
pub fn has_permission(role: &str, permissions: &[String], required: &str) -> bool {
    role == ROLE_SUPER_ADMIN || permissions.iter().any(|p| p == required)
}

/// Whether `role` is protected from deletion.
pub fn is_protected_role(role: &str) -> bool {
    role == ROLE_SUPER_ADMIN
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn super_admin_bypasses_permission_list() {
        assert!(has_permission(ROLE_SUPER_ADMIN, &[], PERM_TRAINING_MANAGE));
    }

    #[test]
    fn granted_permission_is_allowed() {
        let granted = perms(&[PERM_SCREENING_VIEW, PERM_SCREENING_MANAGE]);
        assert!(has_permission(ROLE_STATE_ADMIN, &granted, PERM_SCREENING_MANAGE));
    }

    #[test]
    fn missing_permission_is_denied() {
        let granted = perms(&[PERM_DASHBOARD_VIEW]);
        assert!(!has_permission(ROLE_VIEWER, &granted, PERM_TRAINING_MANAGE));
    }

    #[test]
    fn only_super_admin_is_protected() {
        assert!(is_protected_role(ROLE_SUPER_ADMIN));
        assert!(!is_protected_role(ROLE_CITY_ADMIN));
    }
}
