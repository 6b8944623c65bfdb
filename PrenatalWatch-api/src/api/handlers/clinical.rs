use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{info, instrument};

use crate::api::session::Session;
use crate::api::state::AppState;
use crate::entities::clinical::{
    CreateClinicalEntryBody, PublicClinicalEntry, PublicGuidanceMessage, SendGuidanceBody,
};
use crate::entities::conversions::{
    convert_to_domain_clinical_entry, convert_to_domain_guidance, convert_to_public_clinical_entry,
    convert_to_public_guidance,
};
use crate::entities::ErrorResponse;

/// Encounter notes of a patient, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}/records",
    params(
        ("id" = String, Path, description = "Patient id"),
        ("x-user-id" = String, Header, description = "Caller id"),
        ("x-user-role" = String, Header, description = "Must be clinician")
    ),
    responses(
        (status = 200, description = "Clinical record", body = [PublicClinicalEntry]),
        (status = 403, description = "Caller is not a clinician", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
    ),
    tag = "records"
)]
#[instrument(skip(state, session))]
pub async fn list_clinical_records(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let entries = state.clinical_records.entries(&session.0, &id).await?;
    let entries: Vec<PublicClinicalEntry> = entries.into_iter().map(convert_to_public_clinical_entry).collect();
    Ok((StatusCode::OK, Json(entries)))
}

/// Record an encounter with a patient
#[utoipa::path(
    post,
    path = "/api/v1/patients/{id}/records",
    request_body = CreateClinicalEntryBody,
    params(
        ("id" = String, Path, description = "Patient id"),
        ("x-user-id" = String, Header, description = "Caller id"),
        ("x-user-role" = String, Header, description = "Must be clinician")
    ),
    responses(
        (status = 201, description = "Entry recorded", body = PublicClinicalEntry),
        (status = 400, description = "Invalid entry", body = ErrorResponse),
        (status = 403, description = "Caller is not a clinician", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
    ),
    tag = "records"
)]
#[instrument(skip(state, session, body))]
pub async fn create_clinical_record(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(body): Json<CreateClinicalEntryBody>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let entry = state
        .clinical_records
        .create_entry(&session.0, &id, convert_to_domain_clinical_entry(body))
        .await?;
    info!("Clinical entry {} created for patient {}", entry.id, id);
    Ok((StatusCode::CREATED, Json(convert_to_public_clinical_entry(entry))))
}

/// Guidance messages sent to a patient, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}/guidance",
    params(
        ("id" = String, Path, description = "Patient id"),
        ("x-user-id" = String, Header, description = "Caller id"),
        ("x-user-role" = String, Header, description = "patient or clinician")
    ),
    responses(
        (status = 200, description = "Guidance messages", body = [PublicGuidanceMessage]),
        (status = 404, description = "Patient not found", body = ErrorResponse),
    ),
    tag = "guidance"
)]
#[instrument(skip(state, session))]
pub async fn list_guidance(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let messages = state.guidance.messages(&session.0, &id).await?;
    let messages: Vec<PublicGuidanceMessage> = messages.into_iter().map(convert_to_public_guidance).collect();
    Ok((StatusCode::OK, Json(messages)))
}

/// Send guidance to a patient
#[utoipa::path(
    post,
    path = "/api/v1/patients/{id}/guidance",
    request_body = SendGuidanceBody,
    params(
        ("id" = String, Path, description = "Patient id"),
        ("x-user-id" = String, Header, description = "Caller id"),
        ("x-user-role" = String, Header, description = "Must be clinician")
    ),
    responses(
        (status = 201, description = "Guidance sent", body = PublicGuidanceMessage),
        (status = 400, description = "Invalid message", body = ErrorResponse),
        (status = 403, description = "Caller is not a clinician", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
    ),
    tag = "guidance"
)]
#[instrument(skip(state, session, body))]
pub async fn send_guidance(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(body): Json<SendGuidanceBody>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let message = state
        .guidance
        .send(&session.0, &id, convert_to_domain_guidance(body))
        .await?;
    info!("Guidance {} sent to patient {}", message.id, id);
    Ok((StatusCode::CREATED, Json(convert_to_public_guidance(message))))
}
