use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{info, instrument};

use crate::api::session::Session;
use crate::api::state::AppState;
use crate::entities::conversions::{convert_to_domain_create_report, convert_to_public_report};
use crate::entities::report::{CreateReportBody, PublicReport};
use crate::entities::ErrorResponse;

/// Report history of a patient, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}/reports",
    params(
        ("id" = String, Path, description = "Patient id"),
        ("x-user-id" = String, Header, description = "Caller id"),
        ("x-user-role" = String, Header, description = "patient or clinician")
    ),
    responses(
        (status = 200, description = "Report history", body = [PublicReport]),
        (status = 404, description = "Patient not found", body = ErrorResponse),
    ),
    tag = "reports"
)]
#[instrument(skip(state, session))]
pub async fn list_reports(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let reports = state.reports.history(&session.0, &id).await?;
    let reports: Vec<PublicReport> = reports.into_iter().map(convert_to_public_report).collect();
    Ok((StatusCode::OK, Json(reports)))
}

/// Submit a new diary report
#[utoipa::path(
    post,
    path = "/api/v1/patients/{id}/reports",
    request_body = CreateReportBody,
    params(
        ("id" = String, Path, description = "Patient id"),
        ("x-user-id" = String, Header, description = "Caller id"),
        ("x-user-role" = String, Header, description = "patient or clinician")
    ),
    responses(
        (status = 201, description = "Report stored", body = PublicReport),
        (status = 400, description = "Invalid report", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
    ),
    tag = "reports"
)]
#[instrument(skip(state, session, body))]
pub async fn create_report(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(body): Json<CreateReportBody>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let report = state
        .reports
        .create_report(&session.0, &id, convert_to_domain_create_report(body))
        .await?;
    info!("Report {} created for patient {}", report.id, id);
    Ok((StatusCode::CREATED, Json(convert_to_public_report(report))))
}
