//! Data access layer.

pub mod contacts;
pub mod roles;
pub mod users;
