//! Audit entry capture mechanism.

use cadre_audit_types::AuditLogEntry;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// Configuration for audit capture.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Maximum entries to buffer before new entries are dropped.
    pub buffer_size: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { buffer_size: 10_000 }
    }
}

/// Handle for submitting audit log entries.
///
/// Cloneable; all clones feed the same channel. Submission never blocks the
/// caller: when the buffer is full the entry is dropped with a warning in
/// the operational log.
#[derive(Clone)]
pub struct AuditRecorder {
    sender: mpsc::Sender<AuditLogEntry>,
}

impl AuditRecorder {
    /// Create a new recorder and the receiving end for the writer task.
    pub fn new(config: CaptureConfig) -> (Self, mpsc::Receiver<AuditLogEntry>) {
        let (sender, receiver) = mpsc::channel(config.buffer_size);
        (Self { sender }, receiver)
    }

    /// Record an audit entry (non-blocking).
    pub fn record(&self, entry: AuditLogEntry) {
        match self.sender.try_send(entry) {
            Ok(()) => debug!("audit entry captured"),
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                warn!(
                    resource = %dropped.resource,
                    action = %dropped.action,
                    "audit buffer full, entry dropped"
                );
            }
            Err(mpsc::error::TrySendError::Closed(dropped)) => {
                error!(
                    resource = %dropped.resource,
                    action = %dropped.action,
                    "audit channel closed, entry dropped"
                );
            }
        }
    }

    /// Check if the capture channel is still open.
    pub fn is_healthy(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Get approximate buffer usage in `[0, 1]`.
    pub fn buffer_usage(&self) -> f64 {
        let capacity = self.sender.capacity();
        let max_capacity = self.sender.max_capacity();
        1.0 - (capacity as f64 / max_capacity as f64)
    }
}
