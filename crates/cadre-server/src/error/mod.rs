//! Error handling for the Cadre API server.

pub mod response;
pub mod types;

pub use types::{ApiError, ApiResult};
