//! Request handlers.

pub mod auditlogs;
pub mod auth;
pub mod contacts;
pub mod roles;
