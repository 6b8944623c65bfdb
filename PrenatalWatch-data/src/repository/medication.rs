use async_trait::async_trait;
use tracing::debug;

use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use crate::models::{MedicationRecord, NewMedicationRecord, SessionContext};

/// Repository trait for prescribed medications
#[async_trait]
pub trait MedicationRepositoryTrait: Send + Sync {
    /// Count the medications a patient currently has active
    async fn count_active(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<usize, RepositoryError>;

    /// List every medication row of a patient, active and inactive
    async fn list(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<Vec<MedicationRecord>, RepositoryError>;

    /// Look up a single medication row; unknown ids are `NotFound`
    async fn find(
        &self,
        session: &SessionContext,
        medication_id: &str,
    ) -> Result<MedicationRecord, RepositoryError>;

    /// Store a new, active medication
    async fn create(
        &self,
        session: &SessionContext,
        patient_id: &str,
        request: NewMedicationRecord,
    ) -> Result<MedicationRecord, RepositoryError>;

    /// Flip the active state of a medication.
    ///
    /// Fails with `VersionConflict` when `expected_version` is not the
    /// currently stored version.
    async fn toggle(
        &self,
        session: &SessionContext,
        medication_id: &str,
        expected_version: u64,
        effective_date: &str,
    ) -> Result<MedicationRecord, RepositoryError>;
}

/// Repository for medications backed by in-memory storage
#[derive(Debug, Clone, Default)]
pub struct MedicationRepository {
    storage: InMemoryStorage,
}

impl MedicationRepository {
    /// Create a repository over a shared storage
    pub fn new(storage: InMemoryStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl MedicationRepositoryTrait for MedicationRepository {
    async fn count_active(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<usize, RepositoryError> {
        debug!(user = %session.user_id, "Counting active medications for patient {}", patient_id);
        let medications = self.storage.get_medications(patient_id).await?;
        Ok(medications.iter().filter(|m| m.active).count())
    }

    async fn list(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<Vec<MedicationRecord>, RepositoryError> {
        debug!(user = %session.user_id, "Listing medications for patient {}", patient_id);
        self.storage.get_medications(patient_id).await
    }

    async fn find(
        &self,
        session: &SessionContext,
        medication_id: &str,
    ) -> Result<MedicationRecord, RepositoryError> {
        debug!(user = %session.user_id, "Looking up medication {}", medication_id);
        self.storage.get_medication(medication_id).await
    }

    async fn create(
        &self,
        session: &SessionContext,
        patient_id: &str,
        request: NewMedicationRecord,
    ) -> Result<MedicationRecord, RepositoryError> {
        debug!(user = %session.user_id, "Prescribing {} to patient {}", request.name, patient_id);
        self.storage.store_medication(patient_id, request).await
    }

    async fn toggle(
        &self,
        session: &SessionContext,
        medication_id: &str,
        expected_version: u64,
        effective_date: &str,
    ) -> Result<MedicationRecord, RepositoryError> {
        debug!(user = %session.user_id, "Toggling medication {} at version {}", medication_id, expected_version);
        self.storage
            .toggle_medication(medication_id, expected_version, effective_date)
            .await
    }
}
