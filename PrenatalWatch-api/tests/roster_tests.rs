//! End-to-end roster behaviour over the in-memory repositories

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use tower::ServiceExt;

use prenatal_watch_api::create_application;
use prenatal_watch_data::models::SessionContext;
use prenatal_watch_data::repository::Dependency;
use prenatal_watch_data::seed::demo_storage;
use prenatal_watch_domain::entities::{DataStatus, PartialReason, RiskTier};
use prenatal_watch_domain::services::{cancellation_pair, create_default_services, CancellationSignal, SummaryServiceTrait};
use prenatal_watch_domain::TriageConfig;

#[tokio::test]
async fn test_roster_survives_slow_and_failing_sources() {
    let storage = demo_storage()
        .unwrap()
        .with_outage(Dependency::Medications, "gestante-1")
        .with_delay(Dependency::Reports, "gestante-3", Duration::from_millis(30));
    let services = create_default_services(storage, TriageConfig::default());

    let roster = services
        .summaries
        .roster(&SessionContext::clinician("doc-1"), CancellationSignal::never())
        .await
        .unwrap();

    assert!(!roster.cancelled);
    let tiers: Vec<(&str, RiskTier)> = roster
        .rows
        .iter()
        .map(|row| (row.patient_id.as_str(), row.risk_tier))
        .collect();
    assert_eq!(
        tiers,
        vec![
            ("gestante-2", RiskTier::Critical),
            ("gestante-3", RiskTier::Attention),
            ("gestante-1", RiskTier::Normal),
        ]
    );

    let ana = &roster.rows[2];
    assert_eq!(ana.data_status, DataStatus::Partial(PartialReason::MedicationFetchFailed));
    assert_eq!(ana.active_medication_count, None);
    assert_eq!(ana.total_reports, 2);
}

#[tokio::test]
async fn test_cancelled_roster_returns_every_row() {
    let storage = demo_storage()
        .unwrap()
        .with_delay(Dependency::Reports, "gestante-2", Duration::from_secs(30));
    let services = create_default_services(storage, TriageConfig::default());
    let (handle, signal) = cancellation_pair();
    let session = SessionContext::clinician("doc-1");

    let cancel_soon = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
    };
    let (roster, _) = tokio::join!(services.summaries.roster(&session, signal), cancel_soon);
    let roster = roster.unwrap();

    assert!(roster.cancelled);
    assert_eq!(roster.rows.len(), 3);
    let slow = roster.rows.iter().find(|r| r.patient_id == "gestante-2").unwrap();
    assert_eq!(slow.data_status, DataStatus::Partial(PartialReason::Cancelled));
    assert_eq!(roster.overview().incomplete, 1);
}

#[tokio::test]
async fn test_shutdown_signal_cancels_http_roster() {
    let storage = demo_storage()
        .unwrap()
        .with_delay(Dependency::Medications, "gestante-3", Duration::from_secs(30));
    let (handle, signal) = cancellation_pair();
    let app = create_application(storage, TriageConfig::default(), signal);

    let request = Request::builder()
        .uri("/api/v1/roster")
        .header("x-user-id", "doc-1")
        .header("x-user-role", "clinician")
        .body(Body::empty())
        .unwrap();

    let cancel_soon = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
    };
    let (response, _) = tokio::join!(app.oneshot(request), cancel_soon);
    let response = response.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["cancelled"], true);
    assert_eq!(body["overview"]["total_patients"], 3);
    assert_eq!(body["overview"]["incomplete"], 1);
}
