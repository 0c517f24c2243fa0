//! Core audit log entry type.

use crate::{AuditAction, AuditActor, AuditLogId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One observed, audit-qualifying HTTP interaction.
///
/// Entries are immutable once written; the store only ever appends them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Unique entry identifier.
    pub id: AuditLogId,
    /// Who performed the interaction.
    pub actor: AuditActor,
    /// What kind of operation it was.
    pub action: AuditAction,
    /// Resource-type label (e.g. `contacts`).
    pub resource: String,
    /// Identifier of the affected resource, when one was addressed.
    pub resource_id: Option<String>,
    /// Source IP of the request.
    pub ip_address: Option<String>,
    /// Request/response details captured by the middleware.
    pub details: AuditDetails,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
}

/// Request/response context persisted alongside an entry.
///
/// `body` is the sanitized request body: denied fields are present with a
/// redaction sentinel, never omitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuditDetails {
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Final response status code.
    pub status: u16,
    /// Sanitized JSON request body, if one was captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    /// Route parameters.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, String>,
    /// Query parameters.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub query: HashMap<String, String>,
    /// Caller's user agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl AuditLogEntry {
    /// Create a new entry builder.
    pub fn builder(action: AuditAction, resource: impl Into<String>) -> AuditLogEntryBuilder {
        AuditLogEntryBuilder::new(action, resource)
    }
}

/// Builder for constructing audit log entries.
#[derive(Debug)]
pub struct AuditLogEntryBuilder {
    actor: AuditActor,
    action: AuditAction,
    resource: String,
    resource_id: Option<String>,
    ip_address: Option<String>,
    details: AuditDetails,
}

impl AuditLogEntryBuilder {
    /// Create a new builder.
    pub fn new(action: AuditAction, resource: impl Into<String>) -> Self {
        Self {
            actor: AuditActor::Anonymous,
            action,
            resource: resource.into(),
            resource_id: None,
            ip_address: None,
            details: AuditDetails::default(),
        }
    }

    /// Set the actor.
    pub fn actor(mut self, actor: AuditActor) -> Self {
        self.actor = actor;
        self
    }

    /// Set the affected resource identifier.
    pub fn resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    /// Set the source IP address.
    pub fn ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    /// Set the captured request/response details.
    pub fn details(mut self, details: AuditDetails) -> Self {
        self.details = details;
        self
    }

    /// Build the entry, stamping id and creation time.
    pub fn build(self) -> AuditLogEntry {
        AuditLogEntry {
            id: AuditLogId::new(),
            actor: self.actor,
            action: self.action,
            resource: self.resource,
            resource_id: self.resource_id,
            ip_address: self.ip_address,
            details: self.details,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadre_common_core::UserId;

    #[test]
    fn builder_defaults() {
        let entry = AuditLogEntry::builder(AuditAction::Create, "contacts").build();
        assert_eq!(entry.action, AuditAction::Create);
        assert_eq!(entry.resource, "contacts");
        assert_eq!(entry.actor, AuditActor::Anonymous);
        assert!(entry.resource_id.is_none());
    }

    #[test]
    fn builder_sets_all_fields() {
        let user = UserId::new();
        let details = AuditDetails {
            method: "POST".into(),
            path: "/api/v1/contacts".into(),
            status: 201,
            ..AuditDetails::default()
        };
        let entry = AuditLogEntry::builder(AuditAction::Create, "contacts")
            .actor(AuditActor::user(user, "a@b.c"))
            .resource_id("con_123")
            .ip_address("10.0.0.1")
            .details(details.clone())
            .build();

        assert_eq!(entry.actor.user_id(), Some(user));
        assert_eq!(entry.resource_id.as_deref(), Some("con_123"));
        assert_eq!(entry.ip_address.as_deref(), Some("10.0.0.1"));
        assert_eq!(entry.details, details);
    }

    #[test]
    fn details_serde_round_trip() {
        let details = AuditDetails {
            method: "PUT".into(),
            path: "/api/v1/contacts/42".into(),
            status: 200,
            body: Some(serde_json::json!({"name": "Acme", "password": "[REDACTED]"})),
            params: [("id".to_string(), "42".to_string())].into_iter().collect(),
            query: HashMap::new(),
            user_agent: Some("cadre-test/1.0".into()),
        };
        let json = serde_json::to_string(&details).unwrap();
        let back: AuditDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(back, details);
    }
}
