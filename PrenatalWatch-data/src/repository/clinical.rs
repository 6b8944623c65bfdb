use async_trait::async_trait;
use tracing::debug;

use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use crate::models::{ClinicalEntryRecord, NewClinicalEntryRecord, SessionContext};

/// Repository trait for clinician encounter notes
#[async_trait]
pub trait ClinicalRecordRepositoryTrait: Send + Sync {
    /// List every encounter note of a patient in arrival order
    async fn list_entries(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<Vec<ClinicalEntryRecord>, RepositoryError>;

    /// Store a new encounter note
    async fn create(
        &self,
        session: &SessionContext,
        patient_id: &str,
        request: NewClinicalEntryRecord,
    ) -> Result<ClinicalEntryRecord, RepositoryError>;
}

/// Repository for encounter notes backed by in-memory storage
#[derive(Debug, Clone, Default)]
pub struct ClinicalRecordRepository {
    storage: InMemoryStorage,
}

impl ClinicalRecordRepository {
    /// Create a repository over a shared storage
    pub fn new(storage: InMemoryStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl ClinicalRecordRepositoryTrait for ClinicalRecordRepository {
    async fn list_entries(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<Vec<ClinicalEntryRecord>, RepositoryError> {
        debug!(user = %session.user_id, "Listing clinical record for patient {}", patient_id);
        self.storage.get_clinical_entries(patient_id).await
    }

    async fn create(
        &self,
        session: &SessionContext,
        patient_id: &str,
        request: NewClinicalEntryRecord,
    ) -> Result<ClinicalEntryRecord, RepositoryError> {
        debug!(user = %session.user_id, "Storing clinical entry for patient {}", patient_id);
        self.storage.store_clinical_entry(patient_id, request).await
    }
}
