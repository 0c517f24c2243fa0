//! Permission codes and the permission evaluator.
//!
//! Codes form a closed registry: every grantable action is an associated
//! constant, and routes can only be guarded with codes that exist here. The
//! registry is synchronized into the `permissions` table at startup.

use crate::middleware::auth::AuthUser;
use std::fmt;

/// One grantable action, identified by a globally unique code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PermissionCode(&'static str);

impl PermissionCode {
    pub const CONTACTS_VIEW: Self = Self("contacts_view");
    pub const CONTACTS_CREATE: Self = Self("contacts_create");
    pub const CONTACTS_UPDATE: Self = Self("contacts_update");
    pub const CONTACTS_DELETE: Self = Self("contacts_delete");
    pub const ROLES_VIEW: Self = Self("roles_view");
    pub const ROLES_MANAGE: Self = Self("roles_manage");
    pub const PERMISSIONS_VIEW: Self = Self("permissions_view");
    pub const AUDIT_LOGS_VIEW: Self = Self("auditlogs_view");

    /// The complete registry.
    pub const ALL: &'static [Self] = &[
        Self::CONTACTS_VIEW,
        Self::CONTACTS_CREATE,
        Self::CONTACTS_UPDATE,
        Self::CONTACTS_DELETE,
        Self::ROLES_VIEW,
        Self::ROLES_MANAGE,
        Self::PERMISSIONS_VIEW,
        Self::AUDIT_LOGS_VIEW,
    ];

    /// The string code as stored and granted.
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for PermissionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Outcome of a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionDecision {
    /// The code is in the user's effective permission set.
    Granted,
    /// The user is a super administrator; the check was bypassed.
    GrantedSuperAdmin,
    /// No user, or the code is not granted.
    Denied,
}

impl PermissionDecision {
    /// Whether the request may proceed.
    pub fn is_granted(&self) -> bool {
        !matches!(self, Self::Denied)
    }
}

/// Evaluate whether `user` may perform `code`.
///
/// Fail closed: a missing user context denies. The super-admin bypass is a
/// distinct decision so callers can log it, never an implicit role-name
/// comparison.
pub fn evaluate(user: Option<&AuthUser>, code: PermissionCode) -> PermissionDecision {
    let Some(user) = user else {
        return PermissionDecision::Denied;
    };

    if user.is_super_admin {
        tracing::debug!(
            user_id = %user.id,
            permission = %code,
            "permission check bypassed by super administrator"
        );
        return PermissionDecision::GrantedSuperAdmin;
    }

    if user.permissions.contains(code.as_str()) {
        PermissionDecision::Granted
    } else {
        PermissionDecision::Denied
    }
}

/// Boolean convenience wrapper over [`evaluate`].
pub fn has_permission(user: &AuthUser, code: PermissionCode) -> bool {
    evaluate(Some(user), code).is_granted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadre_common_core::UserId;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn user(permissions: &[&str], is_super_admin: bool) -> AuthUser {
        AuthUser {
            id: UserId::new(),
            email: "test@example.com".into(),
            roles: Vec::new(),
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
            is_super_admin,
        }
    }

    #[test]
    fn registry_codes_are_unique() {
        let codes: HashSet<&str> = PermissionCode::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(codes.len(), PermissionCode::ALL.len());
    }

    #[test]
    fn missing_user_denies() {
        assert_eq!(
            evaluate(None, PermissionCode::CONTACTS_VIEW),
            PermissionDecision::Denied
        );
    }

    #[test]
    fn empty_permission_set_denies_every_code() {
        let u = user(&[], false);
        for code in PermissionCode::ALL {
            assert!(!has_permission(&u, *code));
        }
    }

    #[test]
    fn granted_code_allows_only_that_code() {
        let u = user(&["contacts_create"], false);
        assert!(has_permission(&u, PermissionCode::CONTACTS_CREATE));
        assert!(!has_permission(&u, PermissionCode::CONTACTS_DELETE));
    }

    #[test]
    fn super_admin_bypass_is_distinct() {
        let u = user(&[], true);
        assert_eq!(
            evaluate(Some(&u), PermissionCode::ROLES_MANAGE),
            PermissionDecision::GrantedSuperAdmin
        );
        assert!(has_permission(&u, PermissionCode::ROLES_MANAGE));
    }

    proptest! {
        /// `has_permission` is exactly set membership unless the user is a
        /// super administrator.
        #[test]
        fn evaluator_matches_set_membership(
            granted in proptest::sample::subsequence(PermissionCode::ALL.to_vec(), 0..PermissionCode::ALL.len()),
            checked in proptest::sample::select(PermissionCode::ALL.to_vec()),
            is_super_admin in any::<bool>(),
        ) {
            let codes: Vec<&str> = granted.iter().map(|c| c.as_str()).collect();
            let u = user(&codes, is_super_admin);
            let expected = is_super_admin || granted.contains(&checked);
            prop_assert_eq!(has_permission(&u, checked), expected);
        }
    }
}
