//! Database connection management.

pub mod migration;
pub mod pool;

pub use migration::run_migrations;
pub use pool::{create_pool, verify_connection};
