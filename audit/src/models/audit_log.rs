use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::types::{AuditLogId, CompanyId, UserId};

/// Action recorded by an audit entry.
///
/// CRUD variants cover generic resource access; the remaining variants name
/// the business, auth, and admin operations the platform audits explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Read,
    Update,
    Delete,
    Restore,
    Login,
    Logout,
    LoginFailed,
    PasswordChanged,
    UserDisabled,
    UserEnabled,
    PaymentRecorded,
    InvoiceIssued,
    OccupancyActivated,
    OccupancyEnded,
    ReminderSent,
    Export,
    Error,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Read => "READ",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::Restore => "RESTORE",
            AuditAction::Login => "LOGIN",
            AuditAction::Logout => "LOGOUT",
            AuditAction::LoginFailed => "LOGIN_FAILED",
            AuditAction::PasswordChanged => "PASSWORD_CHANGED",
            AuditAction::UserDisabled => "USER_DISABLED",
            AuditAction::UserEnabled => "USER_ENABLED",
            AuditAction::PaymentRecorded => "PAYMENT_RECORDED",
            AuditAction::InvoiceIssued => "INVOICE_ISSUED",
            AuditAction::OccupancyActivated => "OCCUPANCY_ACTIVATED",
            AuditAction::OccupancyEnded => "OCCUPANCY_ENDED",
            AuditAction::ReminderSent => "REMINDER_SENT",
            AuditAction::Export => "EXPORT",
            AuditAction::Error => "ERROR",
        }
    }

    /// True for the actions that mutate the targeted resource.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            AuditAction::Create | AuditAction::Update | AuditAction::Delete
        )
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the audited operation, supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Success,
    Failure,
    Partial,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Success => "SUCCESS",
            AuditStatus::Failure => "FAILURE",
            AuditStatus::Partial => "PARTIAL",
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Before/after snapshots captured for mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
}

/// One immutable audit record. Never mutated after insertion; the only
/// structural change to the store is bulk removal during cleanup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: AuditLogId,
    pub occurred_at: DateTime<Utc>,
    pub request_id: String,
    pub user_id: Option<UserId>,
    pub user_email: Option<String>,
    pub company_id: CompanyId,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub action: AuditAction,
    pub resource: String,
    pub resource_id: Option<String>,
    pub method: String,
    pub path: String,
    pub status: AuditStatus,
    pub status_code: Option<u16>,
    pub duration_ms: Option<u64>,
    pub changes: Option<AuditLogChanges>,
    pub description: Option<String>,
    pub metadata: Option<Value>,
    pub error_message: Option<String>,
    pub stack_trace: Option<String>,
}

/// Caller-facing draft of an audit record.
///
/// `id` is never supplied; the service assigns it at insertion. When
/// `occurred_at` is omitted it defaults to the insertion time.
#[derive(Debug, Clone)]
pub struct AuditLogEntry {
    pub occurred_at: Option<DateTime<Utc>>,
    pub request_id: String,
    pub user_id: Option<UserId>,
    pub user_email: Option<String>,
    pub company_id: CompanyId,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub action: AuditAction,
    pub resource: String,
    pub resource_id: Option<String>,
    pub method: String,
    pub path: String,
    pub status: AuditStatus,
    pub status_code: Option<u16>,
    pub duration_ms: Option<u64>,
    pub changes: Option<AuditLogChanges>,
    pub description: Option<String>,
    pub metadata: Option<Value>,
    pub error_message: Option<String>,
    pub stack_trace: Option<String>,
}

impl AuditLogEntry {
    /// Builds a draft with the required fields; everything else starts unset.
    pub fn new(
        company_id: CompanyId,
        request_id: impl Into<String>,
        action: AuditAction,
        resource: impl Into<String>,
        method: impl Into<String>,
        path: impl Into<String>,
        status: AuditStatus,
    ) -> Self {
        Self {
            occurred_at: None,
            request_id: request_id.into(),
            user_id: None,
            user_email: None,
            company_id,
            ip: None,
            user_agent: None,
            action,
            resource: resource.into(),
            resource_id: None,
            method: method.into(),
            path: path.into(),
            status,
            status_code: None,
            duration_ms: None,
            changes: None,
            description: None,
            metadata: None,
            error_message: None,
            stack_trace: None,
        }
    }
}

/// Conjunctive filter for audit queries. Every supplied field must match.
#[derive(Debug, Clone, Default)]
pub struct AuditLogFilters {
    pub company_id: Option<CompanyId>,
    pub user_id: Option<UserId>,
    pub action: Option<AuditAction>,
    pub resource: Option<String>,
    pub resource_id: Option<String>,
    pub status: Option<AuditStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub min_duration_ms: Option<u64>,
    pub max_duration_ms: Option<u64>,
}

impl AuditLogFilters {
    /// True when `log` satisfies every supplied field. Date and duration
    /// ranges are inclusive; an absent `duration_ms` is compared as 0.
    pub fn matches(&self, log: &AuditLog) -> bool {
        if let Some(company_id) = self.company_id.as_ref() {
            if &log.company_id != company_id {
                return false;
            }
        }
        if let Some(user_id) = self.user_id.as_ref() {
            if log.user_id.as_ref() != Some(user_id) {
                return false;
            }
        }
        if let Some(action) = self.action {
            if log.action != action {
                return false;
            }
        }
        if let Some(resource) = self.resource.as_deref() {
            if log.resource != resource {
                return false;
            }
        }
        if let Some(resource_id) = self.resource_id.as_deref() {
            if log.resource_id.as_deref() != Some(resource_id) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if log.status != status {
                return false;
            }
        }
        if let Some(from) = self.from {
            if log.occurred_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if log.occurred_at > to {
                return false;
            }
        }
        let duration_ms = log.duration_ms.unwrap_or(0);
        if let Some(min) = self.min_duration_ms {
            if duration_ms < min {
                return false;
            }
        }
        if let Some(max) = self.max_duration_ms {
            if duration_ms > max {
                return false;
            }
        }
        true
    }
}

/// Aggregate statistics over a set of audit entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogStats {
    pub total: usize,
    pub by_action: HashMap<AuditAction, usize>,
    pub by_status: HashMap<AuditStatus, usize>,
    /// Percentage (0-100) of entries with `Failure` status, rounded to two
    /// decimals. 0 when there are no entries.
    pub failure_rate: f64,
    /// Mean of `duration_ms` (absent treated as 0), rounded to the nearest
    /// integer. 0 when there are no entries.
    pub average_duration_ms: u64,
}
