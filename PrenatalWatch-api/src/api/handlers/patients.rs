use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{info, instrument};

use prenatal_watch_domain::entities::KNOWN_SYMPTOMS;

use crate::api::session::Session;
use crate::api::state::AppState;
use crate::entities::conversions::{
    convert_to_public_detail, convert_to_public_roster, convert_to_public_summary, convert_to_public_symptom_count,
};
use crate::entities::summary::{
    PublicPatientDetail, PublicPatientSummary, PublicRoster, PublicSymptomCount, SymptomRankingQuery,
    SymptomVocabulary,
};
use crate::entities::ErrorResponse;

/// Roster of every patient visible to the caller, most severe first
#[utoipa::path(
    get,
    path = "/api/v1/roster",
    params(
        ("x-user-id" = String, Header, description = "Caller id"),
        ("x-user-role" = String, Header, description = "patient or clinician")
    ),
    responses(
        (status = 200, description = "Roster computed", body = PublicRoster),
        (status = 400, description = "Missing session headers", body = ErrorResponse),
        (status = 503, description = "Patient directory unavailable", body = ErrorResponse),
    ),
    tag = "roster"
)]
#[instrument(skip(state, session), fields(user = %session.0.user_id))]
pub async fn get_roster(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, ErrorResponse> {
    let roster = state.summaries.roster(&session.0, state.shutdown.clone()).await?;
    info!("Serving roster with {} rows", roster.rows.len());
    Ok((StatusCode::OK, Json(convert_to_public_roster(roster))))
}

/// Clinical summary of one patient
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}/summary",
    params(
        ("id" = String, Path, description = "Patient id"),
        ("x-user-id" = String, Header, description = "Caller id"),
        ("x-user-role" = String, Header, description = "patient or clinician")
    ),
    responses(
        (status = 200, description = "Summary computed", body = PublicPatientSummary),
        (status = 400, description = "Invalid stored report or session", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(state, session))]
pub async fn get_patient_summary(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let summary = state.summaries.patient_summary(&session.0, &id).await?;
    Ok((StatusCode::OK, Json(convert_to_public_summary(summary))))
}

/// Summary, report history and active medications of one patient
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}",
    params(
        ("id" = String, Path, description = "Patient id"),
        ("x-user-id" = String, Header, description = "Caller id"),
        ("x-user-role" = String, Header, description = "patient or clinician")
    ),
    responses(
        (status = 200, description = "Patient detail", body = PublicPatientDetail),
        (status = 404, description = "Patient not found", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(state, session))]
pub async fn get_patient_detail(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let detail = state.summaries.patient_detail(&session.0, &id).await?;
    Ok((StatusCode::OK, Json(convert_to_public_detail(detail))))
}

/// Most frequent symptoms across a patient's whole history
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}/symptoms",
    params(
        ("id" = String, Path, description = "Patient id"),
        SymptomRankingQuery,
        ("x-user-id" = String, Header, description = "Caller id"),
        ("x-user-role" = String, Header, description = "patient or clinician")
    ),
    responses(
        (status = 200, description = "Ranked symptoms", body = [PublicSymptomCount]),
        (status = 404, description = "Patient not found", body = ErrorResponse),
        (status = 503, description = "Reports unavailable", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(state, session))]
pub async fn get_symptom_ranking(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Query(query): Query<SymptomRankingQuery>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let ranking = state
        .summaries
        .symptom_ranking(&session.0, &id, query.top_k)
        .await?;
    let ranking: Vec<PublicSymptomCount> = ranking.into_iter().map(convert_to_public_symptom_count).collect();
    Ok((StatusCode::OK, Json(ranking)))
}

/// Symptoms offered by the diary form
#[utoipa::path(
    get,
    path = "/api/v1/symptoms/vocabulary",
    responses(
        (status = 200, description = "Known symptoms", body = SymptomVocabulary),
    ),
    tag = "patients"
)]
pub async fn get_symptom_vocabulary() -> Json<SymptomVocabulary> {
    Json(SymptomVocabulary {
        symptoms: KNOWN_SYMPTOMS.iter().map(|s| s.to_string()).collect(),
    })
}
