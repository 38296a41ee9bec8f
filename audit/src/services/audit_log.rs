use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    config::Config,
    error::AuditError,
    models::audit_log::{
        AuditAction, AuditLog, AuditLogEntry, AuditLogFilters, AuditLogStats, AuditStatus,
    },
    store::AuditLogStore,
    types::{AuditLogId, CompanyId, UserId},
};

/// Default number of entries returned by the per-scope read operations.
pub const DEFAULT_LOG_LIMIT: usize = 100;
/// Number of entries returned by `login_history`.
pub const LOGIN_HISTORY_LIMIT: usize = 50;
/// Default number of entries returned by `recent_changes`.
pub const RECENT_CHANGES_LIMIT: usize = 50;

/// Recording seam handed to request-handling code.
///
/// Callers hold an `Arc<dyn AuditLogServiceTrait>` so tests can substitute a
/// mock without a store behind it.
#[async_trait]
pub trait AuditLogServiceTrait: Send + Sync {
    /// Records one audit entry. Fire-and-forget: failures are logged and
    /// swallowed so the audited business operation is never interrupted.
    async fn record_event(&self, entry: AuditLogEntry);
}

/// Records audit entries and answers filtered queries, aggregate statistics,
/// and retention cleanup over the configured store.
///
/// Constructed once at process startup and shared by reference; the
/// configuration is read at construction and never re-read.
pub struct AuditLogService {
    store: Arc<dyn AuditLogStore>,
    max_log_age: Duration,
    recording_enabled: bool,
}

impl AuditLogService {
    pub fn new(store: Arc<dyn AuditLogStore>, config: &Config) -> Self {
        Self {
            store,
            max_log_age: Duration::days(config.max_log_age_days),
            recording_enabled: config.recording_enabled,
        }
    }

    /// Returns entries matching every supplied filter field, most recent
    /// first. An empty result is not an error.
    pub async fn query(&self, filters: &AuditLogFilters) -> Result<Vec<AuditLog>, AuditError> {
        let mut items: Vec<AuditLog> = self
            .store
            .scan()?
            .into_iter()
            .filter(|log| filters.matches(log))
            .collect();
        // Stable sort keeps the relative order of same-timestamp entries.
        items.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(items)
    }

    /// Number of entries matching the filter. Recounted per call.
    pub async fn count(&self, filters: &AuditLogFilters) -> Result<usize, AuditError> {
        Ok(self.query(filters).await?.len())
    }

    /// Most recent entries for one tenant, truncated to `limit` (default 100).
    pub async fn company_logs(
        &self,
        company_id: &CompanyId,
        limit: Option<usize>,
    ) -> Result<Vec<AuditLog>, AuditError> {
        let filters = AuditLogFilters {
            company_id: Some(company_id.clone()),
            ..Default::default()
        };
        let mut items = self.query(&filters).await?;
        items.truncate(limit.unwrap_or(DEFAULT_LOG_LIMIT));
        Ok(items)
    }

    /// Most recent entries for one actor, truncated to `limit` (default 100).
    pub async fn user_logs(
        &self,
        user_id: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<AuditLog>, AuditError> {
        let filters = AuditLogFilters {
            user_id: Some(user_id.clone()),
            ..Default::default()
        };
        let mut items = self.query(&filters).await?;
        items.truncate(limit.unwrap_or(DEFAULT_LOG_LIMIT));
        Ok(items)
    }

    /// Most recent entries for one resource type, truncated to `limit`
    /// (default 100).
    pub async fn resource_logs(
        &self,
        resource: &str,
        limit: Option<usize>,
    ) -> Result<Vec<AuditLog>, AuditError> {
        let filters = AuditLogFilters {
            resource: Some(resource.to_string()),
            ..Default::default()
        };
        let mut items = self.query(&filters).await?;
        items.truncate(limit.unwrap_or(DEFAULT_LOG_LIMIT));
        Ok(items)
    }

    /// Most recent entries touching one specific resource instance, truncated
    /// to `limit` (default 100).
    pub async fn resource_id_logs(
        &self,
        resource_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<AuditLog>, AuditError> {
        let filters = AuditLogFilters {
            resource_id: Some(resource_id.to_string()),
            ..Default::default()
        };
        let mut items = self.query(&filters).await?;
        items.truncate(limit.unwrap_or(DEFAULT_LOG_LIMIT));
        Ok(items)
    }

    /// All failed operations, optionally scoped to one tenant.
    pub async fn failed_operations(
        &self,
        company_id: Option<&CompanyId>,
    ) -> Result<Vec<AuditLog>, AuditError> {
        let filters = AuditLogFilters {
            company_id: company_id.cloned(),
            status: Some(AuditStatus::Failure),
            ..Default::default()
        };
        self.query(&filters).await
    }

    /// Most recent login events for one actor, truncated to 50.
    pub async fn login_history(&self, user_id: &UserId) -> Result<Vec<AuditLog>, AuditError> {
        let filters = AuditLogFilters {
            user_id: Some(user_id.clone()),
            action: Some(AuditAction::Login),
            ..Default::default()
        };
        let mut items = self.query(&filters).await?;
        items.truncate(LOGIN_HISTORY_LIMIT);
        Ok(items)
    }

    /// Most recent create/update/delete entries for one resource type,
    /// truncated to `limit` (default 50).
    pub async fn recent_changes(
        &self,
        resource: &str,
        limit: Option<usize>,
    ) -> Result<Vec<AuditLog>, AuditError> {
        let filters = AuditLogFilters {
            resource: Some(resource.to_string()),
            ..Default::default()
        };
        let mut items: Vec<AuditLog> = self
            .query(&filters)
            .await?
            .into_iter()
            .filter(|log| log.action.is_mutation())
            .collect();
        items.truncate(limit.unwrap_or(RECENT_CHANGES_LIMIT));
        Ok(items)
    }

    /// Aggregate statistics, optionally scoped to one tenant.
    pub async fn stats(
        &self,
        company_id: Option<&CompanyId>,
    ) -> Result<AuditLogStats, AuditError> {
        let filters = AuditLogFilters {
            company_id: company_id.cloned(),
            ..Default::default()
        };
        let items = self.query(&filters).await?;

        let total = items.len();
        let mut by_action: HashMap<AuditAction, usize> = HashMap::new();
        let mut by_status: HashMap<AuditStatus, usize> = HashMap::new();
        let mut failures = 0usize;
        let mut total_duration_ms = 0u64;
        for log in &items {
            *by_action.entry(log.action).or_default() += 1;
            *by_status.entry(log.status).or_default() += 1;
            if log.status == AuditStatus::Failure {
                failures += 1;
            }
            total_duration_ms += log.duration_ms.unwrap_or(0);
        }

        let failure_rate = if total == 0 {
            0.0
        } else {
            round_to_two_decimals(failures as f64 * 100.0 / total as f64)
        };
        let average_duration_ms = if total == 0 {
            0
        } else {
            (total_duration_ms as f64 / total as f64).round() as u64
        };

        Ok(AuditLogStats {
            total,
            by_action,
            by_status,
            failure_rate,
            average_duration_ms,
        })
    }

    /// Single-entry lookup by id.
    pub async fn fetch(&self, id: AuditLogId) -> Result<Option<AuditLog>, AuditError> {
        self.store.fetch(id)
    }

    /// Removes every entry older than the retention window. Returns the
    /// number of entries removed.
    pub async fn cleanup(&self) -> Result<usize, AuditError> {
        let cutoff = Utc::now() - self.max_log_age;
        let removed = self.store.delete_through(cutoff)?;
        tracing::info!(
            removed,
            max_log_age_days = self.max_log_age.num_days(),
            "Purged expired audit log entries"
        );
        Ok(removed)
    }

    fn try_record(&self, entry: AuditLogEntry) -> Result<(), AuditError> {
        let log = build_log(entry);
        tracing::info!(
            action = %log.action,
            resource = %log.resource,
            status = %log.status,
            company_id = %log.company_id,
            request_id = %log.request_id,
            "Recorded audit event"
        );
        if log.status == AuditStatus::Failure {
            tracing::warn!(
                action = %log.action,
                resource = %log.resource,
                resource_id = log.resource_id.as_deref(),
                error_message = log.error_message.as_deref(),
                "Audited operation failed"
            );
        }
        self.store.insert(log)
    }
}

#[async_trait]
impl AuditLogServiceTrait for AuditLogService {
    async fn record_event(&self, entry: AuditLogEntry) {
        if !self.recording_enabled {
            tracing::debug!(
                action = %entry.action,
                resource = %entry.resource,
                "Audit recording disabled, entry dropped"
            );
            return;
        }

        let action = entry.action;
        let resource = entry.resource.clone();
        if let Err(err) = self.try_record(entry) {
            tracing::error!(
                error = %err,
                action = %action,
                resource = %resource,
                "Failed to record audit log"
            );
        }
    }
}

fn build_log(entry: AuditLogEntry) -> AuditLog {
    AuditLog {
        id: AuditLogId::new(),
        occurred_at: entry.occurred_at.unwrap_or_else(Utc::now),
        request_id: entry.request_id,
        user_id: entry.user_id,
        user_email: entry.user_email,
        company_id: entry.company_id,
        ip: entry.ip,
        user_agent: entry.user_agent,
        action: entry.action,
        resource: entry.resource,
        resource_id: entry.resource_id,
        method: entry.method,
        path: entry.path,
        status: entry.status,
        status_code: entry.status_code,
        duration_ms: entry.duration_ms,
        changes: entry.changes,
        description: entry.description,
        metadata: entry.metadata,
        error_message: entry.error_message,
        stack_trace: entry.stack_trace,
    }
}

fn round_to_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
