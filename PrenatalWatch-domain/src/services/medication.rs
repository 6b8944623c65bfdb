use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tracing::{info, instrument, warn};
use validator::Validate;

use prenatal_watch_data::models::SessionContext;
use prenatal_watch_data::repository::MedicationRepositoryTrait;

use crate::entities::conversions::{convert_to_data_new_medication, convert_to_domain_medication};
use crate::entities::{Medication, MedicationList, PrescribeMedicationRequest};
use crate::errors::{map_repo_error, TriageError};
use crate::services::{ensure_clinician, ensure_patient_scope};

/// Trait for medication management operations
#[async_trait]
pub trait MedicationServiceTrait: Send + Sync {
    /// Medications of a patient split into active and history
    async fn list(&self, session: &SessionContext, patient_id: &str) -> Result<MedicationList, TriageError>;

    /// Prescribe a new medication, active from today. Clinicians only.
    async fn prescribe(
        &self,
        session: &SessionContext,
        patient_id: &str,
        request: PrescribeMedicationRequest,
    ) -> Result<Medication, TriageError>;

    /// Flip a medication between active and inactive.
    ///
    /// `expected_version` must match the stored version, otherwise the call
    /// fails with `TriageError::VersionConflict` and nothing changes. A
    /// patient session can only toggle its own medications; anyone else's
    /// look unknown.
    async fn toggle(
        &self,
        session: &SessionContext,
        medication_id: &str,
        expected_version: u64,
    ) -> Result<Medication, TriageError>;
}

/// Medication service for domain logic
pub struct MedicationService<M: MedicationRepositoryTrait> {
    repository: M,
}

impl<M: MedicationRepositoryTrait> MedicationService<M> {
    /// Create a new medication service
    pub fn new(repository: M) -> Self {
        Self { repository }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }
}

#[async_trait]
impl<M: MedicationRepositoryTrait> MedicationServiceTrait for MedicationService<M> {
    #[instrument(skip(self, session), fields(user = %session.user_id))]
    async fn list(&self, session: &SessionContext, patient_id: &str) -> Result<MedicationList, TriageError> {
        ensure_patient_scope(session, patient_id)?;
        let rows = self
            .repository
            .list(session, patient_id)
            .await
            .map_err(map_repo_error)?;
        let medications = rows
            .into_iter()
            .map(convert_to_domain_medication)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MedicationList::from_medications(medications))
    }

    #[instrument(skip(self, session, request), fields(user = %session.user_id))]
    async fn prescribe(
        &self,
        session: &SessionContext,
        patient_id: &str,
        request: PrescribeMedicationRequest,
    ) -> Result<Medication, TriageError> {
        ensure_clinician(session, "prescribe medications")?;
        request
            .validate()
            .map_err(|errors| TriageError::Validation(errors.to_string()))?;
        if request.name.trim().is_empty() {
            return Err(TriageError::Validation("name: Name cannot be blank".to_string()));
        }

        let row = self
            .repository
            .create(session, patient_id, convert_to_data_new_medication(&request, Self::today()))
            .await
            .map_err(map_repo_error)?;

        info!("Prescribed {} to patient {}", row.name, patient_id);
        convert_to_domain_medication(row)
    }

    #[instrument(skip(self, session), fields(user = %session.user_id))]
    async fn toggle(
        &self,
        session: &SessionContext,
        medication_id: &str,
        expected_version: u64,
    ) -> Result<Medication, TriageError> {
        let current = self
            .repository
            .find(session, medication_id)
            .await
            .map_err(map_repo_error)?;
        ensure_patient_scope(session, &current.patient_id)
            .map_err(|_| TriageError::NotFound(format!("medication {}", medication_id)))?;

        let effective_date = Self::today().format("%Y-%m-%d").to_string();
        let row = self
            .repository
            .toggle(session, medication_id, expected_version, &effective_date)
            .await
            .map_err(|err| {
                let err = map_repo_error(err);
                if let TriageError::VersionConflict(msg) = &err {
                    warn!("Stale toggle rejected: {}", msg);
                }
                err
            })?;

        convert_to_domain_medication(row)
    }
}
