//! Audit trail middleware.
//!
//! A tower layer that observes the point at which the response becomes
//! final and records one [`cadre_audit_types::AuditLogEntry`] per
//! qualifying request, without blocking or altering the response. The
//! entry is handed to the capture channel; persistence happens on the
//! detached writer task.

pub mod layer;
pub mod observer;
pub mod redaction;

pub use layer::{AuditLayer, AuditMiddleware};
pub use observer::{should_record, AuditObserver, RequestAudit};
pub use redaction::{redact_json, REDACTED_SENTINEL, SENSITIVE_FIELDS};
