use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, instrument};
use validator::Validate;

use prenatal_watch_data::models::SessionContext;
use prenatal_watch_data::repository::ClinicalRecordRepositoryTrait;

use crate::entities::conversions::{convert_to_data_new_clinical_entry, convert_to_domain_clinical_entry};
use crate::entities::{ClinicalEntry, CreateClinicalEntryRequest};
use crate::errors::{map_repo_error, TriageError};
use crate::services::report::newest_first;
use crate::services::{describe_validation_errors, ensure_clinician};

/// Trait for the clinician-only encounter record of a patient
#[async_trait]
pub trait ClinicalRecordServiceTrait: Send + Sync {
    /// Encounter notes of a patient, most recent first
    async fn entries(&self, session: &SessionContext, patient_id: &str) -> Result<Vec<ClinicalEntry>, TriageError>;

    /// Record an encounter dated today, authored by the session's clinician
    async fn create_entry(
        &self,
        session: &SessionContext,
        patient_id: &str,
        request: CreateClinicalEntryRequest,
    ) -> Result<ClinicalEntry, TriageError>;
}

/// Clinical record service for domain logic
pub struct ClinicalRecordService<C: ClinicalRecordRepositoryTrait> {
    repository: C,
}

impl<C: ClinicalRecordRepositoryTrait> ClinicalRecordService<C> {
    pub fn new(repository: C) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<C: ClinicalRecordRepositoryTrait> ClinicalRecordServiceTrait for ClinicalRecordService<C> {
    #[instrument(skip(self, session), fields(user = %session.user_id))]
    async fn entries(&self, session: &SessionContext, patient_id: &str) -> Result<Vec<ClinicalEntry>, TriageError> {
        ensure_clinician(session, "read clinical records")?;
        let records = self
            .repository
            .list_entries(session, patient_id)
            .await
            .map_err(map_repo_error)?;
        let entries = records
            .into_iter()
            .map(convert_to_domain_clinical_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(newest_first(entries, |entry| entry.date))
    }

    #[instrument(skip(self, session, request), fields(user = %session.user_id))]
    async fn create_entry(
        &self,
        session: &SessionContext,
        patient_id: &str,
        request: CreateClinicalEntryRequest,
    ) -> Result<ClinicalEntry, TriageError> {
        ensure_clinician(session, "write clinical records")?;
        request
            .validate()
            .map_err(|errors| TriageError::Validation(describe_validation_errors(&errors)))?;

        let record = self
            .repository
            .create(
                session,
                patient_id,
                convert_to_data_new_clinical_entry(&request, &session.user_id, Utc::now().date_naive()),
            )
            .await
            .map_err(map_repo_error)?;

        info!("Clinical entry {} recorded for patient {}", record.id, patient_id);
        convert_to_domain_clinical_entry(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::storage_with_patients;
    use mockall::mock;
    use prenatal_watch_data::models::{ClinicalEntryRecord, NewClinicalEntryRecord};
    use prenatal_watch_data::repository::{ClinicalRecordRepository, RepositoryError};

    mock! {
        pub Entries {}

        #[async_trait]
        impl ClinicalRecordRepositoryTrait for Entries {
            async fn list_entries(
                &self,
                session: &SessionContext,
                patient_id: &str,
            ) -> Result<Vec<ClinicalEntryRecord>, RepositoryError>;

            async fn create(
                &self,
                session: &SessionContext,
                patient_id: &str,
                request: NewClinicalEntryRecord,
            ) -> Result<ClinicalEntryRecord, RepositoryError>;
        }
    }

    fn request() -> CreateClinicalEntryRequest {
        CreateClinicalEntryRequest {
            description: "Reported contractions".to_string(),
            prescribed_medications: vec!["Progesterone".to_string()],
            actions: "Referred to the maternity ward".to_string(),
        }
    }

    fn stored(id: &str, date: &str) -> ClinicalEntryRecord {
        ClinicalEntryRecord {
            id: id.to_string(),
            patient_id: "p-1".to_string(),
            clinician_id: "doc-1".to_string(),
            date: date.to_string(),
            description: "Check".to_string(),
            prescribed_medications: vec![],
            actions: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_entry_is_authored_by_session() {
        let service = ClinicalRecordService::new(ClinicalRecordRepository::new(storage_with_patients(&[(
            "p-1", "Ana",
        )])));

        let entry = service
            .create_entry(&SessionContext::clinician("doc-7"), "p-1", request())
            .await
            .unwrap();

        assert_eq!(entry.clinician_id, "doc-7");
        assert_eq!(entry.date, Utc::now().date_naive());
        assert_eq!(entry.prescribed_medications, vec!["Progesterone".to_string()]);

        let entries = service
            .entries(&SessionContext::clinician("doc-1"), "p-1")
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_patients_cannot_read_or_write_the_record() {
        let mut repository = MockEntries::new();
        repository.expect_list_entries().times(0);
        repository.expect_create().times(0);
        let service = ClinicalRecordService::new(repository);
        let patient = SessionContext::patient("p-1");

        assert!(matches!(
            service.entries(&patient, "p-1").await,
            Err(TriageError::Forbidden(_))
        ));
        assert!(matches!(
            service.create_entry(&patient, "p-1", request()).await,
            Err(TriageError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_description_never_reaches_repository() {
        let mut repository = MockEntries::new();
        repository.expect_create().times(0);
        let mut bad = request();
        bad.description = "  ".to_string();

        let result = ClinicalRecordService::new(repository)
            .create_entry(&SessionContext::clinician("doc-1"), "p-1", bad)
            .await;
        assert!(matches!(result, Err(TriageError::Validation(msg)) if msg.contains("description")));
    }

    #[tokio::test]
    async fn test_entries_are_newest_first() {
        let mut repository = MockEntries::new();
        repository.expect_list_entries().times(1).returning(|_, _| {
            Ok(vec![
                stored("e-1", "2024-01-05"),
                stored("e-2", "2024-01-09"),
                stored("e-3", "2024-01-09"),
            ])
        });

        let entries = ClinicalRecordService::new(repository)
            .entries(&SessionContext::clinician("doc-1"), "p-1")
            .await
            .unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e-3", "e-2", "e-1"]);
    }

    #[tokio::test]
    async fn test_unknown_patient() {
        let service = ClinicalRecordService::new(ClinicalRecordRepository::new(storage_with_patients(&[])));
        let result = service.entries(&SessionContext::clinician("doc-1"), "ghost").await;
        assert!(matches!(result, Err(TriageError::NotFound(_))));
    }
}
