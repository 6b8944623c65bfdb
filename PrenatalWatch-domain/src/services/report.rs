use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{info, instrument};
use validator::Validate;

use prenatal_watch_data::models::SessionContext;
use prenatal_watch_data::repository::ReportRepositoryTrait;

use crate::entities::conversions::{convert_to_data_new_report, convert_to_domain_report, convert_to_domain_reports};
use crate::entities::{CreateReportRequest, Report};
use crate::errors::{map_repo_error, TriageError};
use crate::services::{describe_validation_errors, ensure_patient_scope};

/// Order dated items most recent first; among equal dates the one supplied
/// last comes first.
pub fn newest_first<T>(mut items: Vec<T>, date_of: impl Fn(&T) -> NaiveDate) -> Vec<T> {
    items.reverse();
    // Stable, so the reversed arrival order survives among equal dates
    items.sort_by(|a, b| date_of(b).cmp(&date_of(a)));
    items
}

/// Order a history most recent first, with the classifier's tie rule
pub fn order_most_recent_first(reports: Vec<Report>) -> Vec<Report> {
    newest_first(reports, |report| report.date)
}

/// Trait for diary report operations
#[async_trait]
pub trait ReportServiceTrait: Send + Sync {
    /// Validate a create report request
    fn validate_create_request(&self, request: &CreateReportRequest) -> Result<(), TriageError>;

    /// Validate and store a new diary report
    async fn create_report(
        &self,
        session: &SessionContext,
        patient_id: &str,
        request: CreateReportRequest,
    ) -> Result<Report, TriageError>;

    /// Full history of a patient, most recent first
    async fn history(&self, session: &SessionContext, patient_id: &str) -> Result<Vec<Report>, TriageError>;
}

/// Report service for domain logic
pub struct ReportService<R: ReportRepositoryTrait> {
    repository: R,
}

impl<R: ReportRepositoryTrait> ReportService<R> {
    /// Create a new report service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: ReportRepositoryTrait> ReportServiceTrait for ReportService<R> {
    fn validate_create_request(&self, request: &CreateReportRequest) -> Result<(), TriageError> {
        if let Err(validation_errors) = request.validate() {
            return Err(TriageError::Validation(describe_validation_errors(&validation_errors)));
        }

        if request.symptoms.iter().any(|s| s.trim().is_empty()) {
            return Err(TriageError::Validation("symptoms: Symptoms cannot be blank".to_string()));
        }

        Ok(())
    }

    #[instrument(skip(self, session, request), fields(user = %session.user_id))]
    async fn create_report(
        &self,
        session: &SessionContext,
        patient_id: &str,
        request: CreateReportRequest,
    ) -> Result<Report, TriageError> {
        ensure_patient_scope(session, patient_id)?;
        self.validate_create_request(&request)?;

        let record = self
            .repository
            .create(session, patient_id, convert_to_data_new_report(&request))
            .await
            .map_err(map_repo_error)?;

        let report = convert_to_domain_report(record)?;
        info!("Stored report {} for patient {}", report.id, patient_id);
        Ok(report)
    }

    #[instrument(skip(self, session), fields(user = %session.user_id))]
    async fn history(&self, session: &SessionContext, patient_id: &str) -> Result<Vec<Report>, TriageError> {
        ensure_patient_scope(session, patient_id)?;
        let records = self
            .repository
            .list_reports(session, patient_id)
            .await
            .map_err(map_repo_error)?;
        Ok(order_most_recent_first(convert_to_domain_reports(&records)?))
    }
}
