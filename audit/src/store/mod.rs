//! Storage abstraction for audit log entries.

use chrono::{DateTime, Utc};

use crate::error::AuditError;
use crate::models::audit_log::AuditLog;
use crate::types::AuditLogId;

pub mod memory;

pub use memory::MemoryAuditLogStore;

/// Pluggable store for persisting and querying audit entries.
///
/// The in-memory implementation keeps entries for the lifetime of the
/// process; a durable backend can replace it without touching the query and
/// statistics logic layered above.
pub trait AuditLogStore: Send + Sync {
    /// Appends a single entry.
    fn insert(&self, log: AuditLog) -> Result<(), AuditError>;

    /// Returns a point-in-time snapshot of every stored entry, in insertion
    /// order.
    fn scan(&self) -> Result<Vec<AuditLog>, AuditError>;

    /// Removes every entry whose `occurred_at` is at or before `cutoff`.
    /// Returns the number of entries removed.
    fn delete_through(&self, cutoff: DateTime<Utc>) -> Result<usize, AuditError>;

    /// Looks up a single entry by id.
    fn fetch(&self, id: AuditLogId) -> Result<Option<AuditLog>, AuditError>;
}
