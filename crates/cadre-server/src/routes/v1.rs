//! API v1 routes.
//!
//! Middleware order, outside in: authentication → audit → permission
//! check → handler. Authorization denials therefore pass through the audit
//! observer (recorded as 403), while unauthenticated requests are rejected
//! before any audit-qualifying work happens.

use crate::{
    handlers::{auditlogs, auth, contacts, roles},
    middleware::{
        audit::AuditLayer,
        auth::AuthLayer,
        authz::{require_permission, PermissionCode},
    },
    state::AppState,
};
use axum::{
    handler::Handler,
    routing::{delete, get, post},
    Router,
};
use cadre_audit_types::AuditAction;

/// Create the v1 API router.
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(public_routes(state))
        .merge(authenticated_routes(state))
}

fn audit_layer(state: &AppState, resource: &str) -> AuditLayer {
    AuditLayer::new(state.audit.clone())
        .resource(resource)
        .body_capture_limit(state.config.audit.body_capture_limit)
}

fn public_routes(state: &AppState) -> Router<AppState> {
    // Login is audited without mandatory auth: successes log in as 200,
    // failed attempts as 401, with credentials redacted.
    Router::new().route(
        "/auth/login",
        post(auth::login),
    )
    .layer(audit_layer(state, "auth").action(AuditAction::Login))
}

fn authenticated_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(auth::me))
        .nest("/contacts", contact_routes(state))
        .nest("/roles", role_routes(state))
        .route(
            "/permissions",
            get(roles::list_permissions
                .layer(require_permission(PermissionCode::PERMISSIONS_VIEW))),
        )
        .nest("/auditlogs", auditlog_routes())
        .layer(AuthLayer::new(state.config.auth.jwt_secret.clone()))
}

fn contact_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(contacts::list.layer(require_permission(PermissionCode::CONTACTS_VIEW))).post(
                contacts::create.layer(require_permission(PermissionCode::CONTACTS_CREATE)),
            ),
        )
        .route(
            "/:id",
            get(contacts::get.layer(require_permission(PermissionCode::CONTACTS_VIEW)))
                .put(contacts::update.layer(require_permission(PermissionCode::CONTACTS_UPDATE)))
                .delete(
                    contacts::remove.layer(require_permission(PermissionCode::CONTACTS_DELETE)),
                ),
        )
        .layer(audit_layer(state, "contacts"))
}

fn role_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(roles::list.layer(require_permission(PermissionCode::ROLES_VIEW)))
                .post(roles::create.layer(require_permission(PermissionCode::ROLES_MANAGE))),
        )
        .route(
            "/:id",
            delete(roles::remove.layer(require_permission(PermissionCode::ROLES_MANAGE))),
        )
        .route(
            "/:id/permissions",
            post(
                roles::assign_permission.layer(require_permission(PermissionCode::ROLES_MANAGE)),
            ),
        )
        .route(
            "/:id/permissions/:permission_id",
            delete(
                roles::revoke_permission.layer(require_permission(PermissionCode::ROLES_MANAGE)),
            ),
        )
        .layer(audit_layer(state, "roles"))
}

/// Audit log reads carry the permission check but are not themselves
/// audited.
fn auditlog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(auditlogs::list))
        .route("/actions", get(auditlogs::actions))
        .route("/resources", get(auditlogs::resources))
        .route_layer(require_permission(PermissionCode::AUDIT_LOGS_VIEW))
}
