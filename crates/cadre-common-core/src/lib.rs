//! Cadre common core types.

pub mod id;

pub use id::{ContactId, IdParseError, PermissionId, RoleId, UserId};
