//! Background writer draining captured entries into a store.

use cadre_audit_store::AuditStore;
use cadre_audit_types::AuditLogEntry;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Spawn the detached writer task.
///
/// The task runs until every [`crate::AuditRecorder`] clone has been
/// dropped, then drains the remaining buffered entries and exits — awaiting
/// the returned handle after shutdown gives a clean drain point.
///
/// A failed insert is logged and the entry dropped; the task itself never
/// dies on a store error.
pub fn spawn_writer(
    mut receiver: mpsc::Receiver<AuditLogEntry>,
    store: Arc<dyn AuditStore>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(entry) = receiver.recv().await {
            let id = entry.id;
            match store.insert(entry).await {
                Ok(_) => debug!(entry_id = %id, "audit entry persisted"),
                Err(e) => {
                    error!(entry_id = %id, error = %e, "failed to persist audit entry");
                }
            }
        }
        info!("audit writer drained, exiting");
    })
}
