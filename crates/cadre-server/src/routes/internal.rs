//! Internal routes for health checks.

use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

/// Create the internal routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn liveness() -> impl IntoResponse {
    Json(json!({
        "status": "alive",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let database = match crate::db::verify_connection(&state.pool).await {
        Ok(()) => "ok",
        Err(_) => "unavailable",
    };
    let audit_queue = if state.audit.is_healthy() { "ok" } else { "closed" };

    Json(json!({
        "status": if database == "ok" && audit_queue == "ok" { "ready" } else { "degraded" },
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "checks": {
            "database": database,
            "audit_queue": audit_queue,
            "audit_buffer_usage": state.audit.buffer_usage(),
        }
    }))
}
