pub mod clinical;
pub mod frequency;
pub mod guidance;
pub mod medication;
pub mod report;
pub mod risk;
pub mod roster;
pub mod summary;

// Domain services
// The triage engine (risk, frequency, summary, roster) plus the services the
// dashboard writes through: reports, medications, clinical records and guidance.

// Re-export service traits and factory functions
pub use clinical::{ClinicalRecordService, ClinicalRecordServiceTrait};
pub use guidance::{GuidanceService, GuidanceServiceTrait};
pub use medication::{MedicationService, MedicationServiceTrait};
pub use report::{ReportService, ReportServiceTrait};
pub use roster::{cancellation_pair, CancellationHandle, CancellationSignal};
pub use summary::{PatientDataFetcher, PatientSummaryBuilder, SummaryService, SummaryServiceTrait};

use prenatal_watch_data::models::{SessionContext, SessionRole};
use prenatal_watch_data::repository::{
    ClinicalRecordRepository, GuidanceRepository, InMemoryStorage, MedicationRepository, PatientDirectory,
    ReportRepository,
};

use crate::config::TriageConfig;
use crate::errors::TriageError;

/// Patient sessions only reach their own records; anything else looks unknown
pub(crate) fn ensure_patient_scope(session: &SessionContext, patient_id: &str) -> Result<(), TriageError> {
    if matches!(session.role, SessionRole::Patient) && session.user_id != patient_id {
        return Err(TriageError::NotFound(format!("patient {}", patient_id)));
    }
    Ok(())
}

/// Writes reserved to the care team
pub(crate) fn ensure_clinician(session: &SessionContext, action: &str) -> Result<(), TriageError> {
    if matches!(session.role, SessionRole::Clinician) {
        Ok(())
    } else {
        Err(TriageError::Forbidden(format!("only clinicians may {}", action)))
    }
}

/// Flatten validator output into `field: message` pairs
pub(crate) fn describe_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let error_msgs: Vec<String> = errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
                .collect();
            format!("{}: {}", field, error_msgs.join(", "))
        })
        .collect();
    // field_errors is a HashMap, keep messages deterministic
    fields.sort();
    fields.join("; ")
}

/// Every service of the dashboard, wired over one storage
pub struct Services {
    pub summaries: SummaryService<ReportRepository, MedicationRepository, PatientDirectory>,
    pub reports: ReportService<ReportRepository>,
    pub medications: MedicationService<MedicationRepository>,
    pub clinical_records: ClinicalRecordService<ClinicalRecordRepository>,
    pub guidance: GuidanceService<GuidanceRepository>,
}

/// Create the default services using the repositories from the data layer
pub fn create_default_services(storage: InMemoryStorage, config: TriageConfig) -> Services {
    Services {
        summaries: SummaryService::new(
            ReportRepository::new(storage.clone()),
            MedicationRepository::new(storage.clone()),
            PatientDirectory::new(storage.clone()),
            config,
        ),
        reports: ReportService::new(ReportRepository::new(storage.clone())),
        medications: MedicationService::new(MedicationRepository::new(storage.clone())),
        clinical_records: ClinicalRecordService::new(ClinicalRecordRepository::new(storage.clone())),
        guidance: GuidanceService::new(GuidanceRepository::new(storage)),
    }
}
