//! Cadre API Server
//!
//! HTTP server for the Cadre organization-management CRM. The server is
//! built on Axum and follows a layered architecture:
//!
//! - **Routes**: HTTP endpoint definitions
//! - **Handlers**: Request processing logic
//! - **Repositories**: Data access layer
//! - **Middleware**: Cross-cutting concerns — authentication, permission
//!   checks and the audit trail

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod repo;
pub mod response;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Server builder for constructing and running the API server.
pub struct Server {
    config: ServerConfig,
    state: AppState,
    audit_writer: JoinHandle<()>,
}

impl Server {
    /// Create a new server with the given configuration.
    pub async fn new(config: ServerConfig) -> Result<Self, anyhow::Error> {
        let (state, audit_writer) = AppState::new(config.clone()).await?;
        Ok(Self {
            config,
            state,
            audit_writer,
        })
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        routes::create_router(self.state.clone()).layer(TraceLayer::new_for_http())
    }

    /// Run the server, binding to the configured address.
    ///
    /// After the listener shuts down, the audit queue is drained before
    /// returning so buffered entries are not lost.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let addr = self.config.server.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;

        info!("Server listening on {}", addr);

        let router = self.router();
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        // Every recorder clone lives in the router; dropping the state lets
        // the writer drain and exit.
        drop(self.state);
        info!("Draining audit queue");
        self.audit_writer.await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
