use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{info, instrument};

use crate::api::session::Session;
use crate::api::state::AppState;
use crate::entities::conversions::{
    convert_to_domain_prescription, convert_to_public_medication, convert_to_public_medication_list,
};
use crate::entities::medication::{
    PrescribeMedicationBody, PublicMedication, PublicMedicationList, ToggleMedicationBody,
};
use crate::entities::ErrorResponse;

/// Medications of a patient, active and past
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}/medications",
    params(
        ("id" = String, Path, description = "Patient id"),
        ("x-user-id" = String, Header, description = "Caller id"),
        ("x-user-role" = String, Header, description = "patient or clinician")
    ),
    responses(
        (status = 200, description = "Medication list", body = PublicMedicationList),
        (status = 404, description = "Patient not found", body = ErrorResponse),
    ),
    tag = "medications"
)]
#[instrument(skip(state, session))]
pub async fn list_medications(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let list = state.medications.list(&session.0, &id).await?;
    Ok((StatusCode::OK, Json(convert_to_public_medication_list(list))))
}

/// Prescribe a medication, active from today
#[utoipa::path(
    post,
    path = "/api/v1/patients/{id}/medications",
    request_body = PrescribeMedicationBody,
    params(
        ("id" = String, Path, description = "Patient id"),
        ("x-user-id" = String, Header, description = "Caller id"),
        ("x-user-role" = String, Header, description = "patient or clinician")
    ),
    responses(
        (status = 201, description = "Medication prescribed", body = PublicMedication),
        (status = 400, description = "Invalid prescription", body = ErrorResponse),
        (status = 403, description = "Caller is not a clinician", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
    ),
    tag = "medications"
)]
#[instrument(skip(state, session, body))]
pub async fn prescribe_medication(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(body): Json<PrescribeMedicationBody>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let medication = state
        .medications
        .prescribe(&session.0, &id, convert_to_domain_prescription(body))
        .await?;
    info!("Medication {} prescribed to patient {}", medication.id, id);
    Ok((StatusCode::CREATED, Json(convert_to_public_medication(medication))))
}

/// Activate or deactivate a medication
#[utoipa::path(
    post,
    path = "/api/v1/medications/{id}/toggle",
    request_body = ToggleMedicationBody,
    params(
        ("id" = String, Path, description = "Medication id"),
        ("x-user-id" = String, Header, description = "Caller id"),
        ("x-user-role" = String, Header, description = "patient or clinician")
    ),
    responses(
        (status = 200, description = "Medication toggled", body = PublicMedication),
        (status = 404, description = "Medication not found", body = ErrorResponse),
        (status = 409, description = "Stale version", body = ErrorResponse),
    ),
    tag = "medications"
)]
#[instrument(skip(state, session, body))]
pub async fn toggle_medication(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(body): Json<ToggleMedicationBody>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let medication = state
        .medications
        .toggle(&session.0, &id, body.expected_version)
        .await?;
    Ok((StatusCode::OK, Json(convert_to_public_medication(medication))))
}
