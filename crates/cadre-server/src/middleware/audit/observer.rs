//! The per-request response observer.

use axum::http::StatusCode;
use cadre_audit_capture::AuditRecorder;
use cadre_audit_types::{AuditAction, AuditActor, AuditDetails, AuditLogEntry};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Whether a final status qualifies for the audit trail.
///
/// Successes are recorded, and so are authentication and authorization
/// denials (denials are first-class security signal). Every other status is
/// deliberately not recorded.
pub fn should_record(status: StatusCode) -> bool {
    status.is_success() || status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

/// Request context assembled once, before the handler runs.
///
/// `body` is already sanitized; `resource` is already derived from the
/// route configuration or the matched path.
#[derive(Debug, Clone)]
pub struct RequestAudit {
    /// Configured action; `None` derives from the method.
    pub action: Option<AuditAction>,
    pub resource: String,
    pub resource_id: Option<String>,
    pub actor: AuditActor,
    pub ip_address: Option<String>,
    pub method: String,
    pub path: String,
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub body: Option<serde_json::Value>,
    pub user_agent: Option<String>,
}

/// Observes exactly one response completion.
///
/// `finish` is guarded: even if the completion path were entered twice for
/// the same request, at most one entry is recorded.
pub struct AuditObserver {
    recorder: AuditRecorder,
    context: RequestAudit,
    fired: AtomicBool,
}

impl AuditObserver {
    /// Create an observer for one request.
    pub fn new(recorder: AuditRecorder, context: RequestAudit) -> Self {
        Self {
            recorder,
            context,
            fired: AtomicBool::new(false),
        }
    }

    /// Record the entry for the final response status.
    ///
    /// Non-blocking; the first invocation wins and later ones are no-ops.
    pub fn finish(&self, status: StatusCode) {
        if self.fired.swap(true, Ordering::SeqCst) {
            return;
        }
        if !should_record(status) {
            return;
        }

        let ctx = &self.context;
        let action = ctx
            .action
            .unwrap_or_else(|| AuditAction::from_method(&ctx.method));

        let mut builder = AuditLogEntry::builder(action, ctx.resource.clone())
            .actor(ctx.actor.clone())
            .details(AuditDetails {
                method: ctx.method.clone(),
                path: ctx.path.clone(),
                status: status.as_u16(),
                body: ctx.body.clone(),
                params: ctx.params.clone(),
                query: ctx.query.clone(),
                user_agent: ctx.user_agent.clone(),
            });
        if let Some(id) = &ctx.resource_id {
            builder = builder.resource_id(id.clone());
        }
        if let Some(ip) = &ctx.ip_address {
            builder = builder.ip_address(ip.clone());
        }

        self.recorder.record(builder.build());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadre_audit_capture::CaptureConfig;

    fn context() -> RequestAudit {
        RequestAudit {
            action: None,
            resource: "contacts".into(),
            resource_id: Some("42".into()),
            actor: AuditActor::Anonymous,
            ip_address: Some("10.0.0.1".into()),
            method: "POST".into(),
            path: "/api/v1/contacts".into(),
            params: HashMap::new(),
            query: HashMap::new(),
            body: None,
            user_agent: None,
        }
    }

    #[test]
    fn status_filter_boundaries() {
        assert!(!should_record(StatusCode::from_u16(199).unwrap()));
        assert!(should_record(StatusCode::OK));
        assert!(should_record(StatusCode::from_u16(299).unwrap()));
        assert!(!should_record(StatusCode::from_u16(300).unwrap()));
        assert!(!should_record(StatusCode::from_u16(301).unwrap()));
        assert!(should_record(StatusCode::UNAUTHORIZED));
        assert!(should_record(StatusCode::FORBIDDEN));
        assert!(!should_record(StatusCode::NOT_FOUND));
        assert!(!should_record(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn finish_records_once() {
        let (recorder, mut rx) = AuditRecorder::new(CaptureConfig::default());
        let observer = AuditObserver::new(recorder, context());

        observer.finish(StatusCode::CREATED);
        observer.finish(StatusCode::CREATED);

        let entry = rx.try_recv().unwrap();
        assert_eq!(entry.action, AuditAction::Create);
        assert_eq!(entry.resource, "contacts");
        assert_eq!(entry.details.status, 201);
        // The guard swallowed the second invocation.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn non_qualifying_status_records_nothing() {
        let (recorder, mut rx) = AuditRecorder::new(CaptureConfig::default());
        let observer = AuditObserver::new(recorder, context());

        observer.finish(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn configured_action_wins_over_method() {
        let (recorder, mut rx) = AuditRecorder::new(CaptureConfig::default());
        let mut ctx = context();
        ctx.action = Some(AuditAction::Login);
        let observer = AuditObserver::new(recorder, ctx);

        observer.finish(StatusCode::OK);
        assert_eq!(rx.try_recv().unwrap().action, AuditAction::Login);
    }
}
