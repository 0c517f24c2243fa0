//! Server configuration.

mod loader;
mod types;

pub use loader::{load_config, ConfigLoader};
pub use types::{
    AuditConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerBindConfig, ServerConfig,
};
