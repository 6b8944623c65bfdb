use async_trait::async_trait;
use tracing::debug;

use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use crate::models::{GuidanceMessageRecord, NewGuidanceMessageRecord, SessionContext};

/// Repository trait for guidance messages sent to patients
#[async_trait]
pub trait GuidanceRepositoryTrait: Send + Sync {
    /// List every message sent to a patient in arrival order
    async fn list_messages(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<Vec<GuidanceMessageRecord>, RepositoryError>;

    /// Store a new message
    async fn create(
        &self,
        session: &SessionContext,
        patient_id: &str,
        request: NewGuidanceMessageRecord,
    ) -> Result<GuidanceMessageRecord, RepositoryError>;
}

/// Repository for guidance messages backed by in-memory storage
#[derive(Debug, Clone, Default)]
pub struct GuidanceRepository {
    storage: InMemoryStorage,
}

impl GuidanceRepository {
    /// Create a repository over a shared storage
    pub fn new(storage: InMemoryStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl GuidanceRepositoryTrait for GuidanceRepository {
    async fn list_messages(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<Vec<GuidanceMessageRecord>, RepositoryError> {
        debug!(user = %session.user_id, "Listing guidance for patient {}", patient_id);
        self.storage.get_guidance(patient_id).await
    }

    async fn create(
        &self,
        session: &SessionContext,
        patient_id: &str,
        request: NewGuidanceMessageRecord,
    ) -> Result<GuidanceMessageRecord, RepositoryError> {
        debug!(user = %session.user_id, "Sending guidance to patient {}", patient_id);
        self.storage.store_guidance(patient_id, request).await
    }
}
