use axum::http::StatusCode;
use serde_json::json;

use prenatal_watch_data::seed::demo_storage;

use super::{app_over, send, CLINICIAN};

#[tokio::test]
async fn test_new_report_changes_summary() {
    let storage = demo_storage().unwrap();
    let patient = Some(("gestante-1", "patient"));

    let (status, created) = send(
        app_over(storage.clone()),
        "POST",
        "/api/v1/patients/gestante-1/reports",
        patient,
        Some(json!({
            "date": "2024-01-12",
            "mood": "anxious",
            "symptoms": ["bleeding"],
            "heart_rate": 96
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["mood"], "anxious");
    assert_eq!(created["heart_rate"], 96.0);

    let (status, summary) = send(
        app_over(storage),
        "GET",
        "/api/v1/patients/gestante-1/summary",
        CLINICIAN,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_reports"], 3);
    assert_eq!(summary["risk_tier"], "critical");
    assert_eq!(summary["latest_vitals"]["heart_rate"], 96.0);
}

#[tokio::test]
async fn test_invalid_report_is_rejected() {
    let (status, body) = send(
        app_over(demo_storage().unwrap()),
        "POST",
        "/api/v1/patients/gestante-1/reports",
        Some(("gestante-1", "patient")),
        Some(json!({ "date": "12/01/2024", "mood": "normal" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_report_history_most_recent_first() {
    let (status, body) = send(
        app_over(demo_storage().unwrap()),
        "GET",
        "/api/v1/patients/gestante-1/reports",
        CLINICIAN,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], "r-2");
    assert_eq!(body[1]["id"], "r-1");
}
