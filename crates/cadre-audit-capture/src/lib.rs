//! Fire-and-forget audit entry capture.
//!
//! The request path hands finished entries to an [`AuditRecorder`], a
//! non-blocking handle over a bounded channel. A detached writer task drains
//! the channel into an [`cadre_audit_store::AuditStore`]; persistence
//! failures are logged and dropped, never surfaced to the request that
//! produced the entry.

mod capture;
mod writer;

pub use capture::{AuditRecorder, CaptureConfig};
pub use writer::spawn_writer;
