use propkeep_audit::{
    models::audit_log::{AuditAction, AuditStatus},
    services::audit_log::AuditLogServiceTrait,
    types::CompanyId,
};

mod support;

#[tokio::test]
async fn stats_aggregates_actions_statuses_and_durations() {
    let service = support::service();
    let cases = [
        (AuditAction::Create, AuditStatus::Success, 100),
        (AuditAction::Update, AuditStatus::Success, 200),
        (AuditAction::Delete, AuditStatus::Failure, 50),
    ];
    for (action, status, duration_ms) in cases {
        let mut entry = support::entry("comp-1", action, status);
        entry.duration_ms = Some(duration_ms);
        service.record_event(entry).await;
    }

    let stats = service
        .stats(Some(&CompanyId::from("comp-1")))
        .await
        .expect("stats");

    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_action.get(&AuditAction::Create), Some(&1));
    assert_eq!(stats.by_action.get(&AuditAction::Update), Some(&1));
    assert_eq!(stats.by_action.get(&AuditAction::Delete), Some(&1));
    assert_eq!(stats.by_status.get(&AuditStatus::Success), Some(&2));
    assert_eq!(stats.by_status.get(&AuditStatus::Failure), Some(&1));
    assert_eq!(stats.failure_rate, 33.33);
    // round(350 / 3)
    assert_eq!(stats.average_duration_ms, 117);
}

#[tokio::test]
async fn stats_for_unknown_company_avoid_division_by_zero() {
    let service = support::service();
    service
        .record_event(support::entry(
            "comp-1",
            AuditAction::Create,
            AuditStatus::Failure,
        ))
        .await;

    let stats = service
        .stats(Some(&CompanyId::from("nonexistent-company")))
        .await
        .expect("stats");
    assert_eq!(stats.total, 0);
    assert!(stats.by_action.is_empty());
    assert!(stats.by_status.is_empty());
    assert_eq!(stats.failure_rate, 0.0);
    assert_eq!(stats.average_duration_ms, 0);
}

#[tokio::test]
async fn stats_without_company_cover_all_tenants() {
    let service = support::service();
    service
        .record_event(support::entry(
            "comp-1",
            AuditAction::Create,
            AuditStatus::Success,
        ))
        .await;
    service
        .record_event(support::entry(
            "comp-2",
            AuditAction::Delete,
            AuditStatus::Failure,
        ))
        .await;

    let stats = service.stats(None).await.expect("stats");
    assert_eq!(stats.total, 2);
    assert_eq!(stats.failure_rate, 50.0);
}

#[tokio::test]
async fn stats_treat_missing_durations_as_zero() {
    let service = support::service();
    let mut entry = support::entry("comp-1", AuditAction::Read, AuditStatus::Success);
    entry.duration_ms = Some(100);
    service.record_event(entry).await;
    service
        .record_event(support::entry(
            "comp-1",
            AuditAction::Read,
            AuditStatus::Success,
        ))
        .await;

    let stats = service
        .stats(Some(&CompanyId::from("comp-1")))
        .await
        .expect("stats");
    assert_eq!(stats.average_duration_ms, 50);
}
