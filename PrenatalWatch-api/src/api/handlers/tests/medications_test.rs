use axum::http::StatusCode;
use serde_json::json;

use prenatal_watch_data::seed::demo_storage;

use super::{app_over, send, CLINICIAN};

#[tokio::test]
async fn test_list_splits_active_and_history() {
    let (status, body) = send(
        app_over(demo_storage().unwrap()),
        "GET",
        "/api/v1/patients/gestante-2/medications",
        CLINICIAN,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"].as_array().unwrap().len(), 0);
    assert_eq!(body["history"][0]["id"], "med-2");
    assert_eq!(body["history"][0]["ended_on"], "2023-12-20");
}

#[tokio::test]
async fn test_toggle_with_version_check() {
    let storage = demo_storage().unwrap();

    let (status, body) = send(
        app_over(storage.clone()),
        "POST",
        "/api/v1/medications/med-1/toggle",
        CLINICIAN,
        Some(json!({ "expected_version": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);
    assert_eq!(body["version"], 2);

    // Same stale version again
    let (status, body) = send(
        app_over(storage.clone()),
        "POST",
        "/api/v1/medications/med-1/toggle",
        CLINICIAN,
        Some(json!({ "expected_version": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (_, summary) = send(
        app_over(storage),
        "GET",
        "/api/v1/patients/gestante-1/summary",
        CLINICIAN,
        None,
    )
    .await;
    assert_eq!(summary["active_medication_count"], 0);
}

#[tokio::test]
async fn test_prescribe() {
    let storage = demo_storage().unwrap();
    let (status, body) = send(
        app_over(storage),
        "POST",
        "/api/v1/patients/gestante-3/medications",
        CLINICIAN,
        Some(json!({ "name": "Iron", "dosage": "40mg", "frequency": "daily" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["active"], true);
    assert_eq!(body["version"], 1);
}

#[tokio::test]
async fn test_patient_prescription_is_forbidden() {
    let (status, body) = send(
        app_over(demo_storage().unwrap()),
        "POST",
        "/api/v1/patients/gestante-1/medications",
        Some(("gestante-1", "patient")),
        Some(json!({ "name": "Iron", "dosage": "40mg", "frequency": "daily" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_patient_toggle_is_scoped_to_own_medications() {
    let storage = demo_storage().unwrap();

    // med-1 belongs to gestante-1
    let (status, body) = send(
        app_over(storage.clone()),
        "POST",
        "/api/v1/medications/med-1/toggle",
        Some(("gestante-2", "patient")),
        Some(json!({ "expected_version": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, body) = send(
        app_over(storage),
        "POST",
        "/api/v1/medications/med-1/toggle",
        Some(("gestante-1", "patient")),
        Some(json!({ "expected_version": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], 2);
}
