use chrono::{Duration, Utc};

use propkeep_audit::{
    config::Config,
    models::audit_log::{AuditAction, AuditLogFilters, AuditStatus},
    services::audit_log::AuditLogServiceTrait,
};

mod support;

#[tokio::test]
async fn cleanup_removes_only_entries_past_retention() {
    let service = support::service();
    service
        .record_event(support::entry_at(
            "comp-1",
            AuditAction::Create,
            AuditStatus::Success,
            Utc::now() - Duration::days(100),
        ))
        .await;
    service
        .record_event(support::entry(
            "comp-1",
            AuditAction::Update,
            AuditStatus::Success,
        ))
        .await;

    let removed = service.cleanup().await.expect("cleanup");
    assert_eq!(removed, 1);

    let remaining = service
        .query(&AuditLogFilters::default())
        .await
        .expect("query");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].action, AuditAction::Update);
}

#[tokio::test]
async fn cleanup_honors_configured_retention_window() {
    let config = Config {
        max_log_age_days: 10,
        ..Default::default()
    };
    let service = support::service_with_config(&config);
    service
        .record_event(support::entry_at(
            "comp-1",
            AuditAction::Create,
            AuditStatus::Success,
            Utc::now() - Duration::days(11),
        ))
        .await;
    service
        .record_event(support::entry_at(
            "comp-1",
            AuditAction::Update,
            AuditStatus::Success,
            Utc::now() - Duration::days(9),
        ))
        .await;

    let removed = service.cleanup().await.expect("cleanup");
    assert_eq!(removed, 1);

    let remaining = service
        .query(&AuditLogFilters::default())
        .await
        .expect("query");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].action, AuditAction::Update);
}

#[tokio::test]
async fn cleanup_on_empty_store_removes_nothing() {
    let service = support::service();
    assert_eq!(service.cleanup().await.expect("cleanup"), 0);
}
