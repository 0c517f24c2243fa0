//! Middleware for the Cadre API server.

pub mod audit;
pub mod auth;
pub mod authz;

pub use audit::{AuditLayer, AuditMiddleware, AuditObserver};
pub use auth::{Auth, AuthLayer, AuthMiddleware, AuthUser, MaybeAuth};
pub use authz::{
    has_permission, require_permission, PermissionCode, PermissionDecision,
    RequirePermissionLayer, RequirePermissionMiddleware,
};
