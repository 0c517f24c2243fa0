//! Shared application state.

use crate::{config::ServerConfig, db, repo};
use anyhow::Result;
use cadre_audit_capture::{spawn_writer, AuditRecorder, CaptureConfig};
use cadre_audit_store::{AuditStore, PgAuditStore};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// State shared by every handler and middleware.
///
/// Cheap to clone; the audit store is a trait object so tests can swap in
/// the in-memory implementation.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub pool: PgPool,
    pub audit_store: Arc<dyn AuditStore>,
    pub audit: AuditRecorder,
}

impl AppState {
    /// Connect, migrate, synchronize the permission registry and start the
    /// audit writer.
    ///
    /// Returns the state plus the writer's join handle; awaiting the handle
    /// after every state clone is dropped drains the audit queue.
    pub async fn new(config: ServerConfig) -> Result<(Self, JoinHandle<()>)> {
        let pool = db::create_pool(&config.database).await?;
        db::run_migrations(&pool).await?;
        repo::roles::sync_permission_registry(&pool)
            .await
            .map_err(anyhow::Error::new)?;

        let audit_store: Arc<dyn AuditStore> = Arc::new(PgAuditStore::new(pool.clone()));
        let (audit, receiver) = AuditRecorder::new(CaptureConfig {
            buffer_size: config.audit.buffer_size,
        });
        let writer = spawn_writer(receiver, audit_store.clone());

        Ok((
            Self {
                config: Arc::new(config),
                pool,
                audit_store,
                audit,
            },
            writer,
        ))
    }
}
