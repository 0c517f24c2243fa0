//! Audit log actions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The kind of operation an audit log entry records.
///
/// Entries produced by the audit middleware either carry an action
/// configured on the route or one derived from the HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuditAction {
    /// A resource was created.
    Create,
    /// A resource was read or listed.
    Read,
    /// A resource was modified.
    Update,
    /// A resource was deleted.
    Delete,
    /// A login attempt (successful or denied).
    Login,
    /// An explicit logout.
    Logout,
    /// Anything that does not map onto the above.
    Other,
}

impl AuditAction {
    /// Derive the action from an HTTP method name.
    ///
    /// POST maps to create, PUT/PATCH to update, DELETE to delete, GET to
    /// read; every other method is `Other`.
    pub fn from_method(method: &str) -> Self {
        match method {
            "POST" => Self::Create,
            "PUT" | "PATCH" => Self::Update,
            "DELETE" => Self::Delete,
            "GET" => Self::Read,
            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn method_mapping() {
        assert_eq!(AuditAction::from_method("POST"), AuditAction::Create);
        assert_eq!(AuditAction::from_method("PUT"), AuditAction::Update);
        assert_eq!(AuditAction::from_method("PATCH"), AuditAction::Update);
        assert_eq!(AuditAction::from_method("DELETE"), AuditAction::Delete);
        assert_eq!(AuditAction::from_method("GET"), AuditAction::Read);
        assert_eq!(AuditAction::from_method("OPTIONS"), AuditAction::Other);
        assert_eq!(AuditAction::from_method("HEAD"), AuditAction::Other);
    }

    #[test]
    fn snake_case_round_trip() {
        assert_eq!(AuditAction::Create.to_string(), "create");
        assert_eq!(AuditAction::from_str("delete").unwrap(), AuditAction::Delete);
        assert!(AuditAction::from_str("bogus").is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&AuditAction::Login).unwrap();
        assert_eq!(json, "\"login\"");
    }
}
