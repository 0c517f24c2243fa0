//! Permission-code authorization middleware.

pub mod layer;
pub mod permission;

pub use layer::{require_permission, RequirePermissionLayer, RequirePermissionMiddleware};
pub use permission::{evaluate, has_permission, PermissionCode, PermissionDecision};
