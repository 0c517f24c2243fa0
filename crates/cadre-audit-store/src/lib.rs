//! Append-only audit log persistence.
//!
//! The store exposes a single-writer append API plus a filtered, paginated
//! read API. Two implementations are provided: [`PgAuditStore`] backed by
//! Postgres, and [`MemoryAuditStore`] for tests and development.

mod filter;
mod memory;
mod postgres;

pub use filter::{AuditLogFilter, AuditLogPage, SortOrder, MAX_PAGE_SIZE};
pub use memory::MemoryAuditStore;
pub use postgres::PgAuditStore;

use async_trait::async_trait;
use cadre_audit_types::{AuditLogEntry, AuditLogId};

/// Result type for store operations.
pub type AuditStoreResult<T> = Result<T, AuditStoreError>;

/// Errors surfaced by an audit store.
#[derive(Debug, thiserror::Error)]
pub enum AuditStoreError {
    /// The underlying database failed.
    #[error("audit store database error")]
    Database(#[from] sqlx::Error),

    /// An entry could not be (de)serialized.
    #[error("audit store serialization error")]
    Serialization(#[from] serde_json::Error),
}

/// Append-only audit log storage.
///
/// Entries are immutable: there is no update or delete operation, and
/// retention is an operational concern outside the application.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append one entry, returning its identifier.
    async fn insert(&self, entry: AuditLogEntry) -> AuditStoreResult<AuditLogId>;

    /// Read entries matching `filter`, paginated.
    async fn query(&self, filter: &AuditLogFilter) -> AuditStoreResult<AuditLogPage>;

    /// Distinct action values present in the log.
    async fn distinct_actions(&self) -> AuditStoreResult<Vec<String>>;

    /// Distinct resource values present in the log.
    async fn distinct_resources(&self) -> AuditStoreResult<Vec<String>>;
}
