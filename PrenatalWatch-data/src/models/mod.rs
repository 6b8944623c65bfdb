pub mod clinical;
pub mod guidance;
pub mod medication;
pub mod patient;
pub mod report;
pub mod session;

pub use clinical::{ClinicalEntryRecord, NewClinicalEntryRecord};
pub use guidance::{GuidanceMessageRecord, NewGuidanceMessageRecord};
pub use medication::{MedicationRecord, NewMedicationRecord};
pub use patient::PatientRecord;
pub use report::{NewReportRecord, ReportRecord, VitalsRecord, REPORT_SCHEMA_VERSION};
pub use session::{SessionContext, SessionRole};
