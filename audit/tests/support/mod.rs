#![allow(dead_code)]
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use propkeep_audit::{
    config::Config,
    models::audit_log::{AuditAction, AuditLogEntry, AuditStatus},
    services::audit_log::AuditLogService,
    store::MemoryAuditLogStore,
    types::CompanyId,
};

pub fn service() -> AuditLogService {
    service_with_config(&Config::default())
}

pub fn service_with_config(config: &Config) -> AuditLogService {
    AuditLogService::new(Arc::new(MemoryAuditLogStore::new()), config)
}

/// Draft entry with the required fields filled and a fresh request id.
pub fn entry(company: &str, action: AuditAction, status: AuditStatus) -> AuditLogEntry {
    AuditLogEntry::new(
        CompanyId::from(company),
        Uuid::new_v4().to_string(),
        action,
        "invoices",
        "POST",
        "/api/invoices",
        status,
    )
}

pub fn entry_at(
    company: &str,
    action: AuditAction,
    status: AuditStatus,
    occurred_at: DateTime<Utc>,
) -> AuditLogEntry {
    let mut entry = entry(company, action, status);
    entry.occurred_at = Some(occurred_at);
    entry
}
