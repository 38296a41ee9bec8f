use chrono::{DateTime, Utc};
use std::sync::{PoisonError, RwLock};

use crate::error::AuditError;
use crate::models::audit_log::AuditLog;
use crate::store::AuditLogStore;
use crate::types::AuditLogId;

/// In-memory audit log store.
///
/// Entries live for the lifetime of the process; nothing survives a restart.
/// Mutations take the write lock, reads clone a snapshot under the read lock
/// so filtering never iterates a structure mutated concurrently by cleanup.
/// Lock poisoning is recovered rather than propagated: the `Vec` stays
/// structurally sound, and recording must not panic.
#[derive(Debug, Default)]
pub struct MemoryAuditLogStore {
    entries: RwLock<Vec<AuditLog>>,
}

impl MemoryAuditLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditLogStore for MemoryAuditLogStore {
    fn insert(&self, log: AuditLog) -> Result<(), AuditError> {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        entries.push(log);
        Ok(())
    }

    fn scan(&self) -> Result<Vec<AuditLog>, AuditError> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(entries.clone())
    }

    fn delete_through(&self, cutoff: DateTime<Utc>) -> Result<usize, AuditError> {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|log| log.occurred_at > cutoff);
        Ok(before - entries.len())
    }

    fn fetch(&self, id: AuditLogId) -> Result<Option<AuditLog>, AuditError> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(entries.iter().find(|log| log.id == id).cloned())
    }
}
