use async_trait::async_trait;
use tracing::debug;

use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use crate::models::{NewReportRecord, ReportRecord, SessionContext};

/// Repository trait for diary reports
#[async_trait]
pub trait ReportRepositoryTrait: Send + Sync {
    /// List every report of a patient in arrival order
    async fn list_reports(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<Vec<ReportRecord>, RepositoryError>;

    /// Store a new report for a patient
    async fn create(
        &self,
        session: &SessionContext,
        patient_id: &str,
        request: NewReportRecord,
    ) -> Result<ReportRecord, RepositoryError>;
}

/// Repository for diary reports backed by in-memory storage
#[derive(Debug, Clone, Default)]
pub struct ReportRepository {
    storage: InMemoryStorage,
}

impl ReportRepository {
    /// Create a repository over a shared storage
    pub fn new(storage: InMemoryStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl ReportRepositoryTrait for ReportRepository {
    async fn list_reports(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<Vec<ReportRecord>, RepositoryError> {
        debug!(user = %session.user_id, role = %session.role, "Listing reports for patient {}", patient_id);
        self.storage.get_reports(patient_id).await
    }

    async fn create(
        &self,
        session: &SessionContext,
        patient_id: &str,
        request: NewReportRecord,
    ) -> Result<ReportRecord, RepositoryError> {
        debug!(user = %session.user_id, role = %session.role, "Storing report for patient {}", patient_id);
        self.storage.store_report(patient_id, request).await
    }
}
