use async_trait::async_trait;
use tracing::debug;

use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use crate::models::{PatientRecord, SessionContext, SessionRole};

/// Directory of the patients a caregiver follows
#[async_trait]
pub trait PatientDirectoryTrait: Send + Sync {
    /// List the patients visible to the session
    async fn list_patients(&self, session: &SessionContext) -> Result<Vec<PatientRecord>, RepositoryError>;
}

/// Patient directory backed by in-memory storage
#[derive(Debug, Clone, Default)]
pub struct PatientDirectory {
    storage: InMemoryStorage,
}

impl PatientDirectory {
    /// Create a directory over a shared storage
    pub fn new(storage: InMemoryStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl PatientDirectoryTrait for PatientDirectory {
    async fn list_patients(&self, session: &SessionContext) -> Result<Vec<PatientRecord>, RepositoryError> {
        debug!(user = %session.user_id, role = %session.role, "Listing patients");
        let patients = self.storage.get_patients().await?;

        // Patients only ever see their own entry
        Ok(match session.role {
            SessionRole::Clinician => patients,
            SessionRole::Patient => patients
                .into_iter()
                .filter(|p| p.id == session.user_id)
                .collect(),
        })
    }
}
