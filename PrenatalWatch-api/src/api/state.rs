use std::sync::Arc;

use prenatal_watch_domain::services::{
    CancellationSignal, ClinicalRecordServiceTrait, GuidanceServiceTrait, MedicationServiceTrait, ReportServiceTrait,
    Services, SummaryServiceTrait,
};

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub summaries: Arc<dyn SummaryServiceTrait>,
    pub reports: Arc<dyn ReportServiceTrait>,
    pub medications: Arc<dyn MedicationServiceTrait>,
    pub clinical_records: Arc<dyn ClinicalRecordServiceTrait>,
    pub guidance: Arc<dyn GuidanceServiceTrait>,
    /// Fires on server shutdown and abandons in-flight rosters
    pub shutdown: CancellationSignal,
}

impl AppState {
    pub fn new(services: Services, shutdown: CancellationSignal) -> Self {
        Self {
            summaries: Arc::new(services.summaries),
            reports: Arc::new(services.reports),
            medications: Arc::new(services.medications),
            clinical_records: Arc::new(services.clinical_records),
            guidance: Arc::new(services.guidance),
            shutdown,
        }
    }
}
