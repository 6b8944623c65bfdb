use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, instrument};
use validator::Validate;

use prenatal_watch_data::models::SessionContext;
use prenatal_watch_data::repository::GuidanceRepositoryTrait;

use crate::entities::conversions::{convert_to_data_new_guidance, convert_to_domain_guidance};
use crate::entities::{GuidanceMessage, SendGuidanceRequest};
use crate::errors::{map_repo_error, TriageError};
use crate::services::report::newest_first;
use crate::services::{describe_validation_errors, ensure_clinician, ensure_patient_scope};

/// Trait for guidance messages from the care team to a patient
#[async_trait]
pub trait GuidanceServiceTrait: Send + Sync {
    /// Messages sent to a patient, most recent first
    async fn messages(&self, session: &SessionContext, patient_id: &str) -> Result<Vec<GuidanceMessage>, TriageError>;

    /// Send a message dated today. Clinicians only.
    async fn send(
        &self,
        session: &SessionContext,
        patient_id: &str,
        request: SendGuidanceRequest,
    ) -> Result<GuidanceMessage, TriageError>;
}

/// Guidance service for domain logic
pub struct GuidanceService<G: GuidanceRepositoryTrait> {
    repository: G,
}

impl<G: GuidanceRepositoryTrait> GuidanceService<G> {
    pub fn new(repository: G) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<G: GuidanceRepositoryTrait> GuidanceServiceTrait for GuidanceService<G> {
    #[instrument(skip(self, session), fields(user = %session.user_id))]
    async fn messages(&self, session: &SessionContext, patient_id: &str) -> Result<Vec<GuidanceMessage>, TriageError> {
        ensure_patient_scope(session, patient_id)?;
        let records = self
            .repository
            .list_messages(session, patient_id)
            .await
            .map_err(map_repo_error)?;
        let messages = records
            .into_iter()
            .map(convert_to_domain_guidance)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(newest_first(messages, |message| message.date))
    }

    #[instrument(skip(self, session, request), fields(user = %session.user_id))]
    async fn send(
        &self,
        session: &SessionContext,
        patient_id: &str,
        request: SendGuidanceRequest,
    ) -> Result<GuidanceMessage, TriageError> {
        ensure_clinician(session, "send guidance")?;
        request
            .validate()
            .map_err(|errors| TriageError::Validation(describe_validation_errors(&errors)))?;

        let record = self
            .repository
            .create(
                session,
                patient_id,
                convert_to_data_new_guidance(&request, &session.user_id, Utc::now().date_naive()),
            )
            .await
            .map_err(map_repo_error)?;

        info!("Guidance {} sent to patient {}", record.id, patient_id);
        convert_to_domain_guidance(record)
    }
}
